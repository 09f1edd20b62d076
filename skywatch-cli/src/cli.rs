use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use skywatch_core::{
    Config, Coordinates, Dashboard, FixedLocation, Geolocator, NoGeolocation, Screen,
    WeatherProvider, location::geolocator_from_config, present, provider::provider_from_config,
    run_cycle,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about = "SkyWatch weather dashboard")]
pub struct Cli {
    /// OpenWeather API key; overrides the one in the config file.
    #[arg(long, global = true, env = "SKYWATCH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and location preference.
    Configure,

    /// Show the dashboard once, for a city or the current location.
    Show {
        /// City name; if absent, the current location is used.
        city: Option<String>,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Show the dashboard for the current location, then search cities interactively.
    Watch {
        #[command(flatten)]
        location: LocationArgs,
    },
}

/// How to resolve "current location".
#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees (use with --lon).
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees (use with --lat).
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Don't look up the location; start with a city prompt instead.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    no_geolocate: bool,
}

impl LocationArgs {
    fn geolocator(&self, config: &Config) -> Box<dyn Geolocator> {
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Box::new(FixedLocation(Coordinates {
                latitude,
                longitude,
            })),
            _ if self.no_geolocate => Box::new(NoGeolocation),
            _ => geolocator_from_config(config),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(key) = self.api_key {
            config.set_api_key(key);
        }

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city, location } => {
                let provider = provider_from_config(&config)?;
                let mut board = Dashboard::new();

                match city {
                    Some(city) => {
                        board.set_city_input(city);
                        search(&mut board, provider.as_ref(), &config).await;
                    }
                    None => {
                        let geolocator = location.geolocator(&config);
                        mount(&mut board, geolocator.as_ref(), provider.as_ref(), &config).await;
                    }
                }
                Ok(())
            }
            Command::Watch { location } => {
                let provider = provider_from_config(&config)?;
                let geolocator = location.geolocator(&config);
                let mut board = Dashboard::new();

                mount(&mut board, geolocator.as_ref(), provider.as_ref(), &config).await;

                loop {
                    let input = match Text::new("City:")
                        .with_help_message("Enter to search, Esc or Ctrl-C to quit")
                        .prompt()
                    {
                        Ok(input) => input,
                        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                            break;
                        }
                        Err(err) => return Err(err).context("Failed to read city name"),
                    };

                    board.set_city_input(input);
                    search(&mut board, provider.as_ref(), &config).await;
                }
                Ok(())
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(key);
    config.require_api_key()?;

    config.geolocation = Confirm::new("Look up your location automatically on start?")
        .with_default(config.geolocation)
        .prompt()
        .context("Failed to read location preference")?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn mount(
    board: &mut Dashboard,
    geolocator: &dyn Geolocator,
    provider: &dyn WeatherProvider,
    config: &Config,
) {
    println!("{}", Screen::Loading);
    board.mount(geolocator, provider).await;
    render(board, config);
}

async fn search(board: &mut Dashboard, provider: &dyn WeatherProvider, config: &Config) {
    if let Some((ticket, query)) = board.submit_search() {
        render(board, config);
        let outcome = run_cycle(provider, &query).await;
        board.finish(ticket, outcome);
    }
    render(board, config);
}

fn render(board: &Dashboard, config: &Config) {
    println!("{}", present(board.view(), &Local, |icon| config.icon_url(icon)));
}
