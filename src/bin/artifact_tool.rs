//! Artifact maintenance utility.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin artifact_tool -- keygen --out-seed <path> [--out-pub <path>] [--force]
//! cargo run --bin artifact_tool -- sign <artifact_dir>
//! ```
//!
//! `keygen` writes a base64 Ed25519 seed (0600 on Unix) and prints the
//! verifying key. `sign` hashes the artifacts in a directory into
//! `manifest.json` and writes the Ed25519 signature to `artifacts.sig`. The
//! seed is read from the file named by `CARDIOPREDICT_SIGNING_KEY_B64_FILE`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use zeroize::Zeroizing;

use cardiopredict::adapters::artifacts::{
    ArtifactManifest, CLASSIFIER_FILE, MANIFEST_FILE, SCALER_FILE, SCHEMA_FILE, SIGNATURE_FILE,
};

const KEY_FILE_ENV: &str = "CARDIOPREDICT_SIGNING_KEY_B64_FILE";

const USAGE: &str = "Usage:\n  artifact_tool keygen --out-seed <path> [--out-pub <path>] [--force]\n  artifact_tool sign <artifact_dir>";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("keygen") => keygen(args),
        Some("sign") => {
            let dir = args.next().ok_or_else(|| anyhow!("{USAGE}"))?;
            sign(Path::new(&dir))
        }
        Some("-h" | "--help") => {
            println!("{USAGE}");
            Ok(())
        }
        _ => bail!("{USAGE}"),
    }
}

fn keygen(mut args: impl Iterator<Item = String>) -> Result<()> {
    let mut out_seed: Option<PathBuf> = None;
    let mut out_pub: Option<PathBuf> = None;
    let mut force = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out-seed" => out_seed = args.next().map(PathBuf::from),
            "--out-pub" => out_pub = args.next().map(PathBuf::from),
            "--force" => force = true,
            other => bail!("Unknown arg: {other}\n{USAGE}"),
        }
    }
    let out_seed = out_seed.ok_or_else(|| anyhow!("{USAGE}"))?;

    if out_seed.exists() && !force {
        bail!("Refusing to overwrite {out_seed:?} (use --force)");
    }

    let mut seed = Zeroizing::new([0u8; 32]);
    OsRng.fill_bytes(&mut seed[..]);
    let signing_key = SigningKey::from_bytes(&seed);
    let seed_b64 = Zeroizing::new(general_purpose::STANDARD.encode(&seed[..]));
    let pub_b64 = general_purpose::STANDARD.encode(signing_key.verifying_key().to_bytes());

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options
        .open(&out_seed)
        .with_context(|| format!("Failed to create {out_seed:?}"))?;
    std::io::Write::write_all(&mut file, seed_b64.as_bytes())?;

    if let Some(path) = out_pub {
        fs::write(&path, format!("{pub_b64}\n"))
            .with_context(|| format!("Failed to write {path:?}"))?;
    }

    println!("Wrote signing seed to {out_seed:?}");
    println!("Verifying key (set CARDIOPREDICT_ARTIFACT_PUBKEY_B64): {pub_b64}");
    Ok(())
}

fn read_signing_key() -> Result<SigningKey> {
    let path = std::env::var(KEY_FILE_ENV)
        .map_err(|_| anyhow!("{KEY_FILE_ENV} must name the base64 seed file"))?;
    let content = Zeroizing::new(
        fs::read_to_string(path.trim()).context("Failed reading signing key file")?,
    );
    let bytes = Zeroizing::new(
        general_purpose::STANDARD
            .decode(content.trim())
            .context("Signing key is not valid base64")?,
    );
    let seed: Zeroizing<[u8; 32]> = Zeroizing::new(
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("Signing key must be 32 bytes"))?,
    );
    Ok(SigningKey::from_bytes(&seed))
}

fn sign(dir: &Path) -> Result<()> {
    let mut names = vec![CLASSIFIER_FILE, SCALER_FILE];
    if dir.join(SCHEMA_FILE).exists() {
        names.push(SCHEMA_FILE);
    }

    let manifest = ArtifactManifest::for_files(dir, &names)?;
    let bytes = serde_json::to_vec_pretty(&manifest)?;

    let signing_key = read_signing_key()?;
    let signature = signing_key.sign(&bytes);

    fs::write(dir.join(MANIFEST_FILE), &bytes)
        .with_context(|| format!("Failed to write {MANIFEST_FILE}"))?;
    fs::write(dir.join(SIGNATURE_FILE), signature.to_bytes())
        .with_context(|| format!("Failed to write {SIGNATURE_FILE}"))?;

    println!("Signed {} artifact(s) in {dir:?}", manifest.files.len());
    Ok(())
}
