// Copyright 2024 RustFS Team
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

use clap::{Parser, Subcommand};
use shadow_rs::shadow;
use tokengate::config::{ClientArgs, SigningArgs};

shadow!(build);

#[derive(Parser)]
#[command(name = "tokengate")]
#[command(about = "Client-credentials token service", long_about = None)]
#[command(version = build::PKG_VERSION, long_version = build::CLAP_LONG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the token HTTP server
    Server {
        /// Listen port
        #[arg(short, long, env = "TOKENGATE_PORT", default_value_t = 8080)]
        port: u16,

        #[command(flatten)]
        signing: SigningArgs,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Validate a token with the configured key and print its claims as YAML
    Inspect {
        /// The token to check
        #[arg(short, long)]
        token: String,

        #[command(flatten)]
        signing: SigningArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    tokengate::init_tracing();

    match cli.command {
        Commands::Server {
            port,
            signing,
            client,
        } => tokengate::run(port, signing.build()?, client.build()?).await?,
        Commands::Inspect { token, signing } => {
            print!("{}", tokengate::inspect(signing.build()?, &token)?);
        }
    }

    Ok(())
}
