use std::fs;

pub fn settings_export() {
    print!("{}", sugg_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let c = die!(
        sugg_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: max_suggestions={}, max_edit_distance={}, max_cache_size={}, case_sensitive={}",
        c.max_suggestions, c.max_edit_distance, c.max_cache_size, c.case_sensitive
    );
}
