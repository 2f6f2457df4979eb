//! duet — command-line front end for Duet wallets.
//!
//! Creates, imports and backs up single-key wallets for both chains, and
//! signs transactions offline. Chain state (nonce, gas price, unspent
//! outputs) is supplied on the command line or from files; signed raw
//! transactions are printed for broadcast by any node client.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use zeroize::Zeroizing;

use duet_eth::units::{self, Unit};
use duet_eth::EthCall;
use duet_keys::DictionaryRegistry;
use duet_neo::Utxo;
use duet_wallet::{EthWallet, KeystorePreset, NeoTx, NeoWallet, TxParams, WalletError};

use config::CliConfig;

/// Duet command-line wallet.
#[derive(Parser)]
#[command(name = "duet")]
#[command(version, about = "Offline transaction signing for two chains.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account-model chain (secp256k1, hex addresses).
    Eth {
        #[command(subcommand)]
        action: EthAction,
    },
    /// UTXO-model chain (P-256, base58 addresses).
    Neo {
        #[command(subcommand)]
        action: NeoAction,
    },
}

#[derive(Subcommand)]
enum EthAction {
    /// Create a new wallet and write its keystore.
    New(NewArgs),
    /// Import a wallet from a secret and write its keystore.
    Import(ImportArgs),
    /// Show the wallet address.
    Address(KeyArgs),
    /// Show the backup phrase.
    Mnemonic(KeyArgs),
    /// Sign a plain value transfer.
    Transfer(EthTransferArgs),
    /// Sign an ERC20 token transfer.
    Erc20(Erc20Args),
    /// Sign an ERC721 transferFrom.
    Erc721(Erc721Args),
    /// Sign a land parcel transfer.
    Land(LandArgs),
    /// Sign a call with arbitrary data.
    Call(CallArgs),
    /// Print the JSON body of a read-only token query.
    Query(QueryArgs),
}

#[derive(Subcommand)]
enum NeoAction {
    /// Create a new wallet and write its keystore.
    New(NewArgs),
    /// Import a wallet from a secret and write its keystore.
    Import(ImportArgs),
    /// Show the wallet address.
    Address(KeyArgs),
    /// Show the backup phrase.
    Mnemonic(KeyArgs),
    /// Show the wallet import format string.
    Wif(KeyArgs),
    /// Sign a native asset transfer.
    Transfer(NeoTransferArgs),
    /// Sign a gas claim.
    Claim(ClaimArgs),
    /// Sign a token sale purchase.
    Mint(MintArgs),
    /// Sign a token transfer.
    Nep5(Nep5Args),
}

#[derive(Args)]
struct KeyArgs {
    /// Keystore file (default: $DUET_KEYSTORE_DIR/<chain>.json).
    #[arg(short, long)]
    keystore: Option<PathBuf>,
}

#[derive(Args)]
struct NewArgs {
    #[command(flatten)]
    key: KeyArgs,

    /// Replace an existing keystore file.
    #[arg(long)]
    force: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SecretKind {
    Mnemonic,
    PrivateKey,
    Wif,
}

#[derive(Args)]
struct ImportArgs {
    /// Kind of secret to read from the prompt.
    #[arg(long, value_enum)]
    from: SecretKind,

    #[command(flatten)]
    key: KeyArgs,

    /// Replace an existing keystore file.
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct EthTxArgs {
    #[command(flatten)]
    key: KeyArgs,

    /// Account nonce.
    #[arg(long)]
    nonce: u64,

    /// Gas price, in `--gas-unit`.
    #[arg(long)]
    gas_price: String,

    #[arg(long, default_value = "gwei")]
    gas_unit: String,

    #[arg(long, default_value = "21000")]
    gas_limit: u64,
}

#[derive(Args)]
struct EthTransferArgs {
    #[command(flatten)]
    tx: EthTxArgs,

    #[arg(long)]
    to: String,

    /// Amount, in `--unit`.
    #[arg(long)]
    value: String,

    #[arg(long, default_value = "ether")]
    unit: String,
}

#[derive(Args)]
struct Erc20Args {
    #[command(flatten)]
    tx: EthTxArgs,

    #[arg(long)]
    contract: String,

    #[arg(long)]
    to: String,

    /// Token amount as a decimal.
    #[arg(long)]
    amount: String,

    /// Token decimals.
    #[arg(long, default_value = "18")]
    decimals: u32,
}

#[derive(Args)]
struct Erc721Args {
    #[command(flatten)]
    tx: EthTxArgs,

    #[arg(long)]
    contract: String,

    /// Current owner (default: this wallet).
    #[arg(long)]
    from: Option<String>,

    #[arg(long)]
    to: String,

    /// Token id, hex.
    #[arg(long)]
    token_id: String,
}

#[derive(Args)]
struct LandArgs {
    #[command(flatten)]
    tx: EthTxArgs,

    #[arg(long)]
    contract: String,

    #[arg(long)]
    to: String,

    /// Parcel x coordinate, hex.
    #[arg(long)]
    x: String,

    /// Parcel y coordinate, hex.
    #[arg(long)]
    y: String,
}

#[derive(Args)]
struct CallArgs {
    #[command(flatten)]
    tx: EthTxArgs,

    /// Target contract; omit to deploy `--data`.
    #[arg(long, default_value = "")]
    contract: String,

    /// Call data, hex.
    #[arg(long)]
    data: String,

    /// Attached value in ether.
    #[arg(long, default_value = "0")]
    value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TokenQuery {
    Name,
    Symbol,
    Decimals,
    TotalSupply,
    BalanceOf,
}

#[derive(Args)]
struct QueryArgs {
    #[arg(long)]
    contract: String,

    #[arg(long, value_enum)]
    method: TokenQuery,

    /// Holder for `balance-of`.
    #[arg(long)]
    owner: Option<String>,
}

#[derive(Args)]
struct UtxoArgs {
    #[command(flatten)]
    key: KeyArgs,

    /// Unspent outputs as indexer JSON; `-` reads stdin.
    #[arg(long)]
    utxos: PathBuf,
}

#[derive(Args)]
struct NeoTransferArgs {
    #[command(flatten)]
    source: UtxoArgs,

    /// Asset id, hex.
    #[arg(long)]
    asset: String,

    #[arg(long)]
    to: String,

    /// Amount with up to eight decimals.
    #[arg(long)]
    amount: String,
}

#[derive(Args)]
struct ClaimArgs {
    #[command(flatten)]
    source: UtxoArgs,

    /// Claimable gas with up to eight decimals.
    #[arg(long)]
    amount: String,

    /// Destination (default: this wallet).
    #[arg(long)]
    to: Option<String>,
}

#[derive(Args)]
struct MintArgs {
    #[command(flatten)]
    source: UtxoArgs,

    /// Sale contract script hash, hex.
    #[arg(long)]
    contract: String,

    /// Governing tokens to pay.
    #[arg(long)]
    amount: String,

    #[arg(long, default_value = "0")]
    gas: String,
}

#[derive(Args)]
struct Nep5Args {
    #[command(flatten)]
    source: UtxoArgs,

    /// Token contract script hash, hex.
    #[arg(long)]
    contract: String,

    #[arg(long)]
    to: String,

    /// Amount in token base units.
    #[arg(long)]
    amount: i64,

    #[arg(long, default_value = "0")]
    gas: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env()?;
    let registry = DictionaryRegistry::with_defaults();

    match cli.command {
        Commands::Eth { action } => run_eth(action, &config, &registry),
        Commands::Neo { action } => run_neo(action, &config, &registry),
    }
}

fn run_eth(action: EthAction, config: &CliConfig, registry: &DictionaryRegistry) -> Result<()> {
    match action {
        EthAction::New(args) => wallet_new::<EthWallet>(args, config, registry),
        EthAction::Import(args) => wallet_import::<EthWallet>(args, config, registry),
        EthAction::Address(args) => {
            let wallet: EthWallet = open(&args, config)?;
            println!("{}", wallet.address());
            Ok(())
        }
        EthAction::Mnemonic(args) => {
            let wallet: EthWallet = open(&args, config)?;
            println!("{}", wallet.mnemonic(&config.lang, registry)?.as_str());
            Ok(())
        }
        EthAction::Transfer(args) => {
            let wallet: EthWallet = open(&args.tx.key, config)?;
            let value = to_quantity(&args.value, &args.unit)?;
            let tx = EthTx::new(&args.tx)?;
            println!("{}", wallet.transfer(tx.params(), &args.to, &value)?);
            Ok(())
        }
        EthAction::Erc20(args) => {
            let wallet: EthWallet = open(&args.tx.key, config)?;
            let amount = units::to_token_units(&args.amount, args.decimals).context("Invalid token amount")?;
            let tx = EthTx::new(&args.tx)?;
            let raw = wallet.transfer_erc20(tx.params(), &args.contract, &args.to, &units::to_quantity_hex(amount))?;
            println!("{raw}");
            Ok(())
        }
        EthAction::Erc721(args) => {
            let wallet: EthWallet = open(&args.tx.key, config)?;
            let from = args.from.unwrap_or_else(|| wallet.address().to_string());
            let tx = EthTx::new(&args.tx)?;
            let raw = wallet.transfer_from_erc721(tx.params(), &args.contract, &from, &args.to, &args.token_id)?;
            println!("{raw}");
            Ok(())
        }
        EthAction::Land(args) => {
            let wallet: EthWallet = open(&args.tx.key, config)?;
            let tx = EthTx::new(&args.tx)?;
            println!("{}", wallet.transfer_land(tx.params(), &args.contract, &args.to, &args.x, &args.y)?);
            Ok(())
        }
        EthAction::Call(args) => {
            let wallet: EthWallet = open(&args.tx.key, config)?;
            let value = to_quantity(&args.value, "ether")?;
            let tx = EthTx::new(&args.tx)?;
            println!("{}", wallet.contract_call(tx.params(), &args.contract, &value, &args.data)?);
            Ok(())
        }
        EthAction::Query(args) => {
            println!("{}", token_query(&args)?.to_json()?);
            Ok(())
        }
    }
}

fn run_neo(action: NeoAction, config: &CliConfig, registry: &DictionaryRegistry) -> Result<()> {
    match action {
        NeoAction::New(args) => wallet_new::<NeoWallet>(args, config, registry),
        NeoAction::Import(args) => wallet_import::<NeoWallet>(args, config, registry),
        NeoAction::Address(args) => {
            let wallet: NeoWallet = open(&args, config)?;
            println!("{}", wallet.address());
            Ok(())
        }
        NeoAction::Mnemonic(args) => {
            let wallet: NeoWallet = open(&args, config)?;
            println!("{}", wallet.mnemonic(&config.lang, registry)?.as_str());
            Ok(())
        }
        NeoAction::Wif(args) => {
            let wallet: NeoWallet = open(&args, config)?;
            println!("{}", wallet.to_wif().as_str());
            Ok(())
        }
        NeoAction::Transfer(args) => {
            let (wallet, utxos) = open_with_utxos(&args.source, config)?;
            print_neo_tx(&wallet.transfer_asset(&args.asset, &args.to, &args.amount, &utxos)?)
        }
        NeoAction::Claim(args) => {
            let (wallet, utxos) = open_with_utxos(&args.source, config)?;
            let to = args.to.unwrap_or_else(|| wallet.address().to_string());
            print_neo_tx(&wallet.claim(&args.amount, &to, &utxos)?)
        }
        NeoAction::Mint(args) => {
            let (wallet, utxos) = open_with_utxos(&args.source, config)?;
            print_neo_tx(&wallet.mint_token(&args.contract, &args.gas, &args.amount, &utxos)?)
        }
        NeoAction::Nep5(args) => {
            let (wallet, utxos) = open_with_utxos(&args.source, config)?;
            print_neo_tx(&wallet.transfer_nep5(&args.contract, &args.to, &args.gas, args.amount, &utxos)?)
        }
    }
}

/// What the CLI needs from either wallet type.
trait ChainWallet: Sized {
    const CHAIN: &'static str;

    fn generate() -> Self;
    fn address(&self) -> &str;
    fn import(kind: SecretKind, secret: &str, lang: &str, registry: &DictionaryRegistry) -> Result<Self>;
    fn mnemonic(&self, lang: &str, registry: &DictionaryRegistry) -> Result<Zeroizing<String>, WalletError>;
    fn save_keystore(&self, path: &Path, password: &str, preset: KeystorePreset) -> Result<(), WalletError>;
    fn load_keystore(path: &Path, password: &str) -> Result<Self, WalletError>;
}

impl ChainWallet for EthWallet {
    const CHAIN: &'static str = "eth";

    fn generate() -> Self {
        EthWallet::generate()
    }

    fn address(&self) -> &str {
        EthWallet::address(self)
    }

    fn import(kind: SecretKind, secret: &str, lang: &str, registry: &DictionaryRegistry) -> Result<Self> {
        Ok(match kind {
            SecretKind::Mnemonic => EthWallet::from_mnemonic(secret, lang, registry)?,
            SecretKind::PrivateKey => EthWallet::from_private_key(secret)?,
            SecretKind::Wif => bail!("WIF import is only supported for neo wallets"),
        })
    }

    fn mnemonic(&self, lang: &str, registry: &DictionaryRegistry) -> Result<Zeroizing<String>, WalletError> {
        EthWallet::mnemonic(self, lang, registry)
    }

    fn save_keystore(&self, path: &Path, password: &str, preset: KeystorePreset) -> Result<(), WalletError> {
        EthWallet::save_keystore(self, path, password, preset)
    }

    fn load_keystore(path: &Path, password: &str) -> Result<Self, WalletError> {
        EthWallet::load_keystore(path, password)
    }
}

impl ChainWallet for NeoWallet {
    const CHAIN: &'static str = "neo";

    fn generate() -> Self {
        NeoWallet::generate()
    }

    fn address(&self) -> &str {
        NeoWallet::address(self)
    }

    fn import(kind: SecretKind, secret: &str, lang: &str, registry: &DictionaryRegistry) -> Result<Self> {
        Ok(match kind {
            SecretKind::Mnemonic => NeoWallet::from_mnemonic(secret, lang, registry)?,
            SecretKind::PrivateKey => NeoWallet::from_private_key(secret)?,
            SecretKind::Wif => NeoWallet::from_wif(secret)?,
        })
    }

    fn mnemonic(&self, lang: &str, registry: &DictionaryRegistry) -> Result<Zeroizing<String>, WalletError> {
        NeoWallet::mnemonic(self, lang, registry)
    }

    fn save_keystore(&self, path: &Path, password: &str, preset: KeystorePreset) -> Result<(), WalletError> {
        NeoWallet::save_keystore(self, path, password, preset)
    }

    fn load_keystore(path: &Path, password: &str) -> Result<Self, WalletError> {
        NeoWallet::load_keystore(path, password)
    }
}

/// Create a new wallet, print its backup phrase, and save its keystore.
fn wallet_new<W: ChainWallet>(args: NewArgs, config: &CliConfig, registry: &DictionaryRegistry) -> Result<()> {
    let path = config.keystore_path(W::CHAIN, args.key.keystore.as_deref());
    ensure_writable(&path, args.force)?;
    let password = password(config, true)?;

    let wallet = W::generate();
    let phrase = wallet.mnemonic(&config.lang, registry)?;

    println!("\n=== WALLET CREATED ===");
    println!("Address: {}", wallet.address());
    println!("\nBACKUP PHRASE (24 WORDS):");
    println!("  {}", phrase.as_str());
    println!("\nWARNING: This phrase will NOT be shown again unless you export it.");
    println!("Anyone with this phrase can spend your funds.");

    store(&wallet, &path, &password, config.keystore_preset)?;
    println!("\nKeystore saved to: {}", path.display());
    Ok(())
}

/// Restore a wallet from a prompted secret and save its keystore.
fn wallet_import<W: ChainWallet>(args: ImportArgs, config: &CliConfig, registry: &DictionaryRegistry) -> Result<()> {
    let path = config.keystore_path(W::CHAIN, args.key.keystore.as_deref());
    ensure_writable(&path, args.force)?;

    let prompt = match args.from {
        SecretKind::Mnemonic => "Enter backup phrase",
        SecretKind::PrivateKey => "Enter private key (hex)",
        SecretKind::Wif => "Enter WIF",
    };
    let secret = Zeroizing::new(prompt_password(prompt)?);
    let wallet = W::import(args.from, &secret, &config.lang, registry).context("Failed to import wallet")?;
    let password = password(config, true)?;

    store(&wallet, &path, &password, config.keystore_preset)?;
    println!("Imported {} wallet {}", W::CHAIN, wallet.address());
    println!("Keystore saved to: {}", path.display());
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("Keystore already exists: {} (use --force to replace)", path.display());
    }
    Ok(())
}

fn store<W: ChainWallet>(wallet: &W, path: &Path, password: &str, preset: KeystorePreset) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    wallet
        .save_keystore(path, password, preset)
        .context("Failed to save keystore")
}

/// Load the keystore named by `args`, asking for its password.
fn open<W: ChainWallet>(args: &KeyArgs, config: &CliConfig) -> Result<W> {
    let path = config.keystore_path(W::CHAIN, args.keystore.as_deref());
    if !path.exists() {
        bail!("No keystore at {} (create one with `duet {} new`)", path.display(), W::CHAIN);
    }
    let password = password(config, false)?;
    W::load_keystore(&path, &password).with_context(|| format!("Failed to open keystore {}", path.display()))
}

fn open_with_utxos(args: &UtxoArgs, config: &CliConfig) -> Result<(NeoWallet, Vec<Utxo>)> {
    let json = if args.utxos.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read unspent outputs from stdin")?
    } else {
        std::fs::read_to_string(&args.utxos)
            .with_context(|| format!("Failed to read {}", args.utxos.display()))?
    };
    let utxos = Utxo::parse_list(&json).context("Invalid unspent output list")?;
    debug!(count = utxos.len(), source = %args.utxos.display(), "unspent outputs loaded");
    let wallet = open(&args.key, config)?;
    Ok((wallet, utxos))
}

fn print_neo_tx(tx: &NeoTx) -> Result<()> {
    let out = serde_json::json!({ "txid": tx.id, "raw": tx.data });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Decimal `amount` in `unit` as a hex quantity.
fn to_quantity(amount: &str, unit: &str) -> Result<String> {
    let unit: Unit = unit.parse().with_context(|| format!("Unknown unit {unit:?}"))?;
    let wei = units::to_wei(amount, unit).with_context(|| format!("Invalid amount {amount:?}"))?;
    Ok(units::to_quantity_hex(wei))
}

/// Hex-encoded nonce and gas settings for one transaction.
struct EthTx {
    nonce: String,
    gas_price: String,
    gas_limit: String,
}

impl EthTx {
    fn new(args: &EthTxArgs) -> Result<Self> {
        Ok(Self {
            nonce: format!("{:#x}", args.nonce),
            gas_price: to_quantity(&args.gas_price, &args.gas_unit)?,
            gas_limit: format!("{:#x}", args.gas_limit),
        })
    }

    fn params(&self) -> TxParams<'_> {
        TxParams::new(&self.nonce, &self.gas_price, &self.gas_limit)
    }
}

fn token_query(args: &QueryArgs) -> Result<EthCall> {
    let contract = args.contract.as_str();
    Ok(match args.method {
        TokenQuery::Name => EthCall::erc20_name(contract),
        TokenQuery::Symbol => EthCall::erc20_symbol(contract),
        TokenQuery::Decimals => EthCall::erc20_decimals(contract),
        TokenQuery::TotalSupply => EthCall::erc20_total_supply(contract),
        TokenQuery::BalanceOf => {
            let owner = args.owner.as_deref().context("--owner is required for balance-of")?;
            EthCall::erc20_balance_of(contract, owner)?
        }
    })
}

/// Keystore password from `DUET_PASSWORD`, or prompted without echo.
fn password(config: &CliConfig, confirm: bool) -> Result<Zeroizing<String>> {
    if let Some(p) = &config.password {
        return Ok(Zeroizing::new(p.clone()));
    }
    let password = Zeroizing::new(prompt_password("Enter keystore password")?);
    if confirm {
        let again = Zeroizing::new(prompt_password("Confirm password")?);
        if *password != *again {
            bail!("Passwords do not match");
        }
    }
    Ok(password)
}

/// Prompt for a secret (no echo).
fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(format!("{prompt}: ")).context("Failed to read password")
}
