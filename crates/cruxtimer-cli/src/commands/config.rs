use clap::Subcommand;
use cruxtimer_core::timer::format_clock;
use cruxtimer_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value, e.g. `timer.rest_secs`
    Get { key: String },
    /// Change one value and save it
    Set { key: String, value: String },
    /// Print the whole config as stored on disk
    List,
    /// Print the config file location
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            println!("{}", Config::load()?.require(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {}", config.require(&key)?);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            print!("{}", config.to_toml()?);
            let settings = config.timer_settings();
            let mode = if settings.auto_advance {
                format!("auto-advance, {} rest", format_clock(u64::from(settings.rest_secs)))
            } else {
                "manual".to_string()
            };
            println!("# timer runs: {mode}");
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("reset {}", Config::path()?.display());
        }
    }
    Ok(())
}
