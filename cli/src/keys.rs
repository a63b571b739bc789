use anyhow::{Context, Result, anyhow};
use blsct_curve::{HexCodec, Scalar};
use blsct_keys::{ChildKey, DoublePublicKey, SpendingKey, SubAddr, SubAddrId, ViewKey};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Serialize, Deserialize)]
pub struct KeyFile {
    pub seed: Scalar,
}

/// View and spend keys of a seed
pub struct Wallet {
    pub view: ViewKey,
    pub spend: SpendingKey,
}

impl Wallet {
    pub fn from_seed(seed: &Scalar) -> Result<Self> {
        let tx_key = ChildKey::from_seed(seed)?.to_tx_key();
        Ok(Self {
            view: tx_key.to_view_key(),
            spend: tx_key.to_spending_key(),
        })
    }

    pub fn sub_addr(&self, account: u64, address: u64) -> SubAddr {
        SubAddr::generate(
            &self.view,
            &self.spend.to_public_key(),
            SubAddrId::new(account, address),
        )
    }

    /// The wallet's default address, sub-address `(0, 0)`
    pub fn primary_address(&self) -> DoublePublicKey {
        self.sub_addr(0, 0).into()
    }
}

/// Decimal `u64` or a 32-byte big-endian hex scalar
pub fn parse_seed(s: &str) -> Result<Scalar> {
    if let Ok(n) = s.parse::<u64>() {
        return Ok(Scalar::from_u64(n));
    }
    Scalar::from_hex(s).with_context(|| format!("Invalid seed: {s}"))
}

/// `~/.blsct/keys`
pub fn key_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow!("Could not determine home directory"))?;
    Ok(Path::new(&home).join(".blsct").join("keys"))
}

pub fn save(path: &Path, key_file: &KeyFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
            println!("📁 Created directory: {}", dir.display());

            #[cfg(unix)]
            {
                let mut perms = fs::metadata(dir)?.permissions();
                perms.set_mode(0o700);
                fs::set_permissions(dir, perms)?;
            }
        }
    }

    if path.exists() {
        return Err(anyhow!(
            "File {} already exists. Remove it first or use a different filename.",
            path.display()
        ));
    }

    let json = serde_json::to_string_pretty(key_file)?;
    let mut f = OpenOptions::new().write(true).create_new(true).open(path)?;

    #[cfg(unix)]
    {
        let mut perms = f.metadata()?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load(path: &Path) -> Result<KeyFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse key file: {}", path.display()))
}
