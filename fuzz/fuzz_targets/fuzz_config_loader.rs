#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // We fuzz TOML parsing of Config and ensure it never panics and rejects invalids gracefully.
    // Inline tables go all the way through table validation; CSV paths are not followed.
    let parsed = toml::from_str::<windcal_config::Config>(data);
    match parsed {
        Ok(cfg) => {
            if cfg.table.csv.is_none() {
                let _ = windcal_core::corrector_from_config(&cfg, std::path::Path::new("."));
            } else {
                let _ = cfg.validate();
            }
        }
        Err(_e) => {
            // parse error is acceptable
        }
    }
});
