use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "completions")]
use clap::CommandFactory;

use crate::cli::{Cli, Commands, FilterArgs, SourceArgs};
use crate::commands::{
    run_export, run_login, run_logout, run_show, run_top, run_whoami, ExportOptions,
    LoginOptions, ShowOptions, SourceOptions, TopOptions,
};
use crate::config::{render_config, ResolvedConfig};
use crate::error::Result;
use crate::pipeline::FilterOptions;

pub fn run(cli: Cli, resolved: &ResolvedConfig) -> Result<()> {
    match cli.command {
        Commands::Login {
            username,
            password,
            login_url,
            users_url,
            session_file,
        } => {
            let mut endpoints = resolved.server.endpoints();
            if let Some(url) = login_url {
                endpoints.login_url = url;
            }
            if let Some(url) = users_url {
                endpoints.users_url = url;
            }
            let options = LoginOptions {
                username,
                password,
                endpoints,
                timeout: timeout(resolved),
                session_path: session_path(session_file, resolved),
            };
            run_login(&options)
        }

        Commands::Logout { session_file } => run_logout(session_path(session_file, resolved)),

        Commands::Whoami { session_file } => run_whoami(session_path(session_file, resolved)),

        Commands::Show {
            source,
            filters,
            sort,
            sort_mode,
            format,
            page,
            page_size,
            all,
            quiet,
        } => {
            let defaults = &resolved.view;
            let options = ShowOptions {
                source: source_options(source, resolved),
                filters: filter_options(filters, resolved),
                sort,
                sort_mode: sort_mode.unwrap_or(defaults.sort_mode),
                format: format.unwrap_or(defaults.format),
                page,
                page_size: page_size.unwrap_or(defaults.page_size),
                all,
                quiet,
            };
            run_show(&options)
        }

        Commands::Export {
            source,
            filters,
            sort,
            sort_mode,
            output,
        } => {
            let options = ExportOptions {
                source: source_options(source, resolved),
                filters: filter_options(filters, resolved),
                sort,
                sort_mode: sort_mode.unwrap_or(resolved.view.sort_mode),
                output: output.unwrap_or_else(|| resolved.export.output.clone()),
            };
            run_export(&options)
        }

        Commands::Top {
            source,
            limit,
            format,
            quiet,
        } => {
            let defaults = &resolved.top;
            let options = TopOptions {
                source: source_options(source, resolved),
                limit: limit.unwrap_or(defaults.limit),
                format: format.unwrap_or(defaults.format),
                quiet,
            };
            run_top(&options)
        }

        Commands::Config => {
            let rendered = render_config(resolved)?;
            println!("{rendered}");
            Ok(())
        }

        #[cfg(feature = "completions")]
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "webtrack", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn timeout(resolved: &ResolvedConfig) -> Option<Duration> {
    let secs = resolved.server.timeout_secs;
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn session_path(flag: Option<PathBuf>, resolved: &ResolvedConfig) -> PathBuf {
    flag.unwrap_or_else(|| resolved.session.path.clone())
}

fn source_options(args: SourceArgs, resolved: &ResolvedConfig) -> SourceOptions {
    let mut endpoints = resolved.server.endpoints();
    if let Some(url) = args.reports_url {
        endpoints.reports_url = url;
    }
    SourceOptions {
        input: args.input,
        endpoints,
        timeout: timeout(resolved),
        session_path: session_path(args.session_file, resolved),
    }
}

fn filter_options(args: FilterArgs, resolved: &ResolvedConfig) -> FilterOptions {
    FilterOptions {
        system_name: args.system,
        user_name: args.user,
        browser_name: args.browser,
        min_minutes: args.min_minutes,
        from: args.from,
        to: args.to,
        prune_idle: args.prune_idle || resolved.view.prune_idle,
    }
}
