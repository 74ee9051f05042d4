// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_plan;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::cmd::show::ShowFormat;
use crate::cmd::show::show_plan;
use crate::error::Fallible;
use crate::plan::Snapshot;
use crate::plan_file::load_plan;
use crate::sample::sample_plan;
use crate::types::date::Date;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Open the study planner in the browser.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Seed the planner from a TOML plan file instead of the sample plan.
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Start with no topics.
        #[arg(long, conflicts_with = "plan")]
        empty: bool,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Check that a plan file is valid.
    Check {
        /// Path to the plan file.
        plan: PathBuf,
    },
    /// Print a plan with days left and progress.
    Show {
        /// Path to a plan file. Defaults to the sample plan.
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Output format.
        #[arg(long, default_value_t = ShowFormat::Text)]
        format: ShowFormat,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let today = Date::today();
    match cli {
        Command::Serve {
            port,
            plan,
            empty,
            no_open,
        } => {
            let plan = initial_plan(plan, empty, today)?;
            let config = ServerConfig {
                port,
                open_browser: !no_open,
            };
            start_server(config, plan).await
        }
        Command::Check { plan } => check_plan(&plan),
        Command::Show { plan, format } => {
            let plan = initial_plan(plan, false, today)?;
            show_plan(&plan, today, format)
        }
    }
}

/// The snapshot a session starts from.
fn initial_plan(path: Option<PathBuf>, empty: bool, today: Date) -> Fallible<Snapshot> {
    match path {
        Some(path) => load_plan(&path, today),
        None if empty => Ok(Snapshot::empty()),
        None => {
            log::debug!("Using the sample plan.");
            sample_plan(today)
        }
    }
}
