pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod library;
pub mod models;
pub mod parser;
pub mod services;

use cli::{AuditArgs, Cli, Commands, GenerateArgs, ScanArgs, UpdateArgs};
pub use config::Config;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);
    config.validate()?;

    match cli.command {
        Commands::ExportSheets { input, output } => cli::cmd_export_sheets(&input, &output),

        Commands::AuditCollections {
            plex_url,
            plex_token,
            tmdb_api_key,
            poster_config,
            output_dir,
        } => {
            let args = AuditArgs {
                plex_url,
                plex_token,
                tmdb_api_key,
                poster_config,
                output_dir,
            };
            cli::cmd_audit_collections(&config, args).await
        }

        Commands::GenerateOnePace {
            csv_dir,
            output,
            start_season,
            summaries,
            sagas,
        } => {
            let args = GenerateArgs {
                csv_dir,
                output,
                start_season,
                summaries,
                sagas,
            };
            cli::cmd_generate_one_pace(&config, args)
        }

        Commands::ScanFolders {
            movie_dir,
            show_dir,
            repository,
            token,
            output,
            dispatch,
            dry_run,
        } => {
            let args = ScanArgs {
                movie_dir,
                show_dir,
                repository,
                token,
                output,
                dispatch,
                dry_run,
            };
            cli::cmd_scan_folders(&config, args).await
        }

        Commands::UpdateMetadata {
            movie_file,
            show_file,
            json_data,
            json_file,
            dry_run,
        } => cli::cmd_update_metadata(UpdateArgs {
            movie_file,
            show_file,
            json_data,
            json_file,
            dry_run,
        }),

        Commands::FindMissingPosters {
            movie_file,
            show_file,
            movie_report,
            show_report,
        } => cli::cmd_find_missing_posters(
            &config,
            &movie_file,
            &show_file,
            movie_report,
            show_report,
        ),

        Commands::Init => {
            if Config::create_default_if_missing(cli.config.as_deref())? {
                println!("✓ Config file created. Edit it and run again.");
            } else {
                println!("Config file already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}
