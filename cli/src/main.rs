mod demo;
mod keys;

use anyhow::{Context, Result};
use blsct_address::{Address, AddressEncoding};
use blsct_config::BlsctConfig;
use blsct_curve::{HexCodec, Scalar};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let config = BlsctConfig::global();
    log::debug!("Using chain {} ({})", config.chain.network, config.chain.network.hrp());

    let cmd = &args[1];

    let result = match cmd.as_str() {
        "keygen" => keygen(&args[2..]),
        "subaddr" => {
            if args.len() < 5 {
                println!("Usage: subaddr <keyfile> <account> <address> [--bech32]");
                return;
            }
            subaddr(&args[2], &args[3], &args[4], &args[5..])
        }
        "decode-address" => {
            if args.len() < 3 {
                println!("Usage: decode-address <address>");
                return;
            }
            decode_address(&args[2])
        }
        "demo" => {
            let amount = match args.get(2).map(|s| s.parse::<u64>()) {
                None => 1_000_000,
                Some(Ok(amount)) => amount,
                Some(Err(_)) => {
                    eprintln!("❌ Error: Amount must be a valid number");
                    return;
                }
            };
            demo::run(amount)
        }
        "sample-config" => {
            print!("{}", BlsctConfig::generate_sample());
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            println!("❌ Unknown command: {}", cmd);
            println!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error running {}: {:#}", cmd, e);
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("BLSCT CLI - confidential transaction keys and addresses");
    println!();
    println!("USAGE:");
    println!("  blsct <command> [args]");
    println!();
    println!("KEY COMMANDS:");
    println!("  keygen [filename] [--seed <s>]        Generate a key file (default: id.json)");
    println!("  subaddr <keyfile> <account> <addr>    Print a sub-address");
    println!("  decode-address <address>              Show the keys behind an address");
    println!();
    println!("OTHER COMMANDS:");
    println!("  demo [amount]                         Build and verify two transactions");
    println!("  sample-config                         Print a sample blsct.toml");
    println!("  help                                  Show this help message");
    println!();
    println!("OPTIONS:");
    println!("  --seed <s>      Decimal integer or 32-byte hex scalar");
    println!("  --bech32        Encode with bech32 instead of the configured encoding");
    println!();
    println!("EXAMPLES:");
    println!("  blsct keygen                          # Random seed in ~/.blsct/keys/id.json");
    println!("  blsct keygen alice.json --seed 42     # Deterministic key");
    println!("  blsct subaddr ~/.blsct/keys/alice.json 0 7");
    println!("  blsct demo 5000000");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("  BLSCT_CONFIG               Config file path");
    println!("  BLSCT_CHAIN                mainnet/testnet/signet/regtest");
    println!("  BLSCT_FEE_PER_COMPONENT    Fee per input and output");
    println!("  BLSCT_ADDRESS_ENCODING     bech32/bech32m");
    println!("  RUST_LOG                   Log level (debug/info/warn/error)");
}

fn keygen(args: &[String]) -> Result<()> {
    let mut filename = None;
    let mut seed = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                if let Some(s) = args.get(i + 1) {
                    seed = Some(keys::parse_seed(s)?);
                    i += 1;
                }
            }
            other => filename = Some(other.to_string()),
        }
        i += 1;
    }

    let key_filename = filename.unwrap_or_else(|| "id.json".to_string());
    let key_path = if key_filename.contains(std::path::MAIN_SEPARATOR) {
        PathBuf::from(&key_filename)
    } else {
        keys::key_dir()?.join(&key_filename)
    };

    println!("🔐 Generating new key...");
    let seed = seed.unwrap_or_else(Scalar::random);
    let wallet = keys::Wallet::from_seed(&seed)?;
    keys::save(&key_path, &keys::KeyFile { seed })?;

    let address = Address::encode(&wallet.primary_address(), AddressEncoding::configured())?;
    println!("✅ Wrote new key to {}", key_path.display());
    println!("🔑 View public key:  {}", wallet.view.to_public_key().as_point());
    println!("🔑 Spend public key: {}", wallet.spend.to_public_key().as_point());
    println!("📫 Address (0, 0):   {}", address);

    Ok(())
}

fn subaddr(key_path: &str, account: &str, address: &str, flags: &[String]) -> Result<()> {
    let account: u64 = account.parse().context("Account must be a valid number")?;
    let address: u64 = address.parse().context("Address must be a valid number")?;
    let encoding = if flags.iter().any(|f| f == "--bech32") {
        AddressEncoding::Bech32
    } else {
        AddressEncoding::configured()
    };

    let key_file = keys::load(&PathBuf::from(key_path))?;
    let wallet = keys::Wallet::from_seed(&key_file.seed)?;
    let dpk = wallet.sub_addr(account, address).to_double_public_key();

    println!("{}", Address::encode(&dpk, encoding)?);
    Ok(())
}

fn decode_address(s: &str) -> Result<()> {
    let address: Address = s.parse()?;
    let summary = serde_json::json!({
        "chain": address.chain.name(),
        "encoding": address.encoding,
        "view_key": address.key.view_key().as_point().to_hex(),
        "spend_key": address.key.spend_key().as_point().to_hex(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
