use crate::config::Settings;

/// Load settings before the terminal enters raw mode, so diagnostics can
/// still reach stderr. A broken or invalid config never stops startup.
pub fn load_settings() -> Settings {
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("fermata: failed to load config, using defaults: {e}");
            return Settings::default();
        }
    };

    if let Err(msg) = settings.validate() {
        eprintln!("fermata: invalid config, using defaults: {msg}");
        return Settings::default();
    }

    settings
}
