//! SecretBox command-line client.
//!
//! ```text
//!   .env / environment / --config file
//!       → AppConfig
//!       → Wallet (per account: address, permit signing)
//!       → SigningProxyClient (sending as that address)
//!       → SecretBox facade
//!       → JSON on stdout, logs and --metrics output on stderr
//! ```
//!
//! Execute and query go through a signing proxy; see
//! `secret_box_client::blockchain::proxy` for the protocol it must serve.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use secret_box_client::blockchain::{BlockchainError, SigningProxyClient, Wallet};
use secret_box_client::config::{self, AccountConfig, AppConfig};
use secret_box_client::contract::{QueryResult, SecretBox};
use secret_box_client::observability::{logging, metrics};
use secret_box_client::permit::{verify_permit, Permission, Permit};

#[derive(Parser)]
#[command(name = "secret-box")]
#[command(about = "Client for the SecretBox net-worth contract", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics for this run to stderr on exit.
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the configured contract and check the proxy
    Info,
    /// List configured accounts with their key-derived addresses
    Accounts,
    /// Submit a net worth for an account
    SubmitNetWorth {
        #[arg(short, long)]
        account: String,
        networth: String,
    },
    /// Set the viewing key for an account
    SetViewingKey {
        #[arg(short, long)]
        account: String,
        key: String,
    },
    /// Query all info for an address using its viewing key
    AllInfo {
        #[arg(long)]
        addr: String,
        #[arg(short, long)]
        key: String,
    },
    /// Ask whether an address is the richest, using its viewing key
    AmIRichest {
        #[arg(long)]
        addr: String,
        #[arg(short, long)]
        key: String,
    },
    /// Sign a query permit for an account and write it to a file
    Permit {
        #[arg(short, long)]
        account: String,
        #[arg(short, long)]
        name: String,
        /// all_info or am_i_richest; repeat for several
        #[arg(short, long = "permission")]
        permissions: Vec<String>,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Query all info with a permit file
    AllInfoWithPermit {
        #[arg(short, long)]
        permit: PathBuf,
    },
    /// Ask whether the permit signer is the richest
    AmIRichestWithPermit {
        #[arg(short, long)]
        permit: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let initial_level = std::env::var(config::loader::ENV_LOG_LEVEL)
        .unwrap_or_else(|_| logging::DEFAULT_LEVEL.to_string());
    let log_handle = logging::init(&initial_level);

    let metrics_handle = if cli.metrics {
        Some(metrics::init_metrics()?)
    } else {
        None
    };

    let config = config::load_config(cli.config.as_deref())?;
    if let Some(handle) = &log_handle {
        handle.set_level(&config.observability.log_level);
    }

    tracing::info!(
        url = %config.network.url,
        proxy_url = %config.network.proxy_endpoint(),
        chain_id = %config.network.chain_id,
        code_id = config.contract.code_id,
        code_hash = %config.contract.code_hash,
        contract_address = %config.contract.address,
        "Configuration loaded"
    );

    let secret_box = SecretBox::from_config(&config);
    let exit_code = run(cli.command, &config, &secret_box).await?;

    if let Some(handle) = metrics_handle {
        eprint!("{}", handle.render());
    }

    Ok(exit_code)
}

async fn run(command: Commands, config: &AppConfig, secret_box: &SecretBox) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        Commands::Info => {
            let client = SigningProxyClient::new(config.network.clone(), "")?;
            let healthy = client.is_healthy().await;
            let chain = match client.verify_chain_id().await {
                Ok(()) => "ok".to_string(),
                Err(e) => e.to_string(),
            };
            print_json(&serde_json::json!({
                "node": config.network.url,
                "proxy": config.network.proxy_endpoint(),
                "chain_id": config.network.chain_id,
                "reachable": healthy,
                "chain_check": chain,
                "code_id": config.contract.code_id,
                "code_hash": config.contract.code_hash,
                "contract_address": config.contract.address,
                "permit_chain_id": config.permit_chain_id(),
            }))?;
        }
        Commands::Accounts => {
            let accounts: Vec<_> = config
                .accounts
                .iter()
                .map(|account| {
                    let (address, error) = match Wallet::from_account(account) {
                        Ok(wallet) => (Some(wallet.address().to_string()), None),
                        Err(e) => (account.address.clone(), Some(e.to_string())),
                    };
                    serde_json::json!({
                        "name": account.name,
                        "key_env": account.key_env,
                        "address": address,
                        "error": error,
                    })
                })
                .collect();
            print_json(&accounts)?;
        }
        Commands::SubmitNetWorth { account, networth } => {
            let client = sending_client(config, &account)?;
            let tx = secret_box.submit_net_worth(&client, &networth).await?;
            print_json(&tx)?;
        }
        Commands::SetViewingKey { account, key } => {
            let client = sending_client(config, &account)?;
            let tx = secret_box.set_viewing_key(&client, &key).await?;
            print_json(&tx)?;
        }
        Commands::AllInfo { addr, key } => {
            let client = SigningProxyClient::new(config.network.clone(), addr.clone())?;
            let result = secret_box.query_all_info(&client, &addr, &key).await?;
            return print_result(&result);
        }
        Commands::AmIRichest { addr, key } => {
            let client = SigningProxyClient::new(config.network.clone(), addr.clone())?;
            let result = secret_box.query_am_i_richest(&client, &addr, &key).await?;
            return print_result(&result);
        }
        Commands::Permit { account, name, permissions, out } => {
            let account = find_account(config, &account)?;
            let wallet = Wallet::from_account(account)?;

            let mut selected = Vec::new();
            for raw in &permissions {
                if let Some(permission) = Permission::parse_selection(raw)? {
                    selected.push(permission);
                }
            }

            let permit = secret_box.generate_permit(&wallet, &name, &selected).await?;
            permit.save(&out)?;
            tracing::info!(path = ?out, "Permit written");
            print_json(&permit)?;
        }
        Commands::AllInfoWithPermit { permit } => {
            let permit = load_permit(&permit, secret_box)?;
            let client = SigningProxyClient::new(config.network.clone(), "")?;
            let result = secret_box.query_all_info_with_permit(&client, &permit).await?;
            return print_result(&result);
        }
        Commands::AmIRichestWithPermit { permit } => {
            let permit = load_permit(&permit, secret_box)?;
            let client = SigningProxyClient::new(config.network.clone(), "")?;
            let result = secret_box.query_am_i_richest_with_permit(&client, &permit).await?;
            return print_result(&result);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn find_account<'a>(config: &'a AppConfig, name: &str) -> Result<&'a AccountConfig, BlockchainError> {
    config
        .account(name)
        .ok_or_else(|| BlockchainError::NotAvailable(format!("account '{}' is not configured", name)))
}

fn sending_client(config: &AppConfig, name: &str) -> Result<SigningProxyClient, BlockchainError> {
    let account = find_account(config, name)?;
    let wallet = Wallet::from_account(account)?;
    SigningProxyClient::new(config.network.clone(), wallet.address())
}

/// Load a permit, warning about problems the chain would reject it for.
fn load_permit(path: &Path, secret_box: &SecretBox) -> Result<Permit, Box<dyn Error>> {
    let permit = Permit::load(path)?;
    if let Err(e) = verify_permit(&permit) {
        tracing::warn!(error = %e, "Permit signature does not verify locally");
    }
    if !permit.allows_contract(secret_box.address()) {
        tracing::warn!(
            contract_address = %secret_box.address(),
            allowed = ?permit.params.allowed_tokens,
            "Permit is not scoped to the configured contract"
        );
    }
    Ok(permit)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_result<T: Serialize>(result: &QueryResult<T>) -> Result<ExitCode, Box<dyn Error>> {
    match result {
        QueryResult::Answer(answer) => {
            print_json(answer)?;
            Ok(ExitCode::SUCCESS)
        }
        QueryResult::Error(message) => {
            eprintln!("Contract error: {}", message);
            Ok(ExitCode::from(2))
        }
    }
}
