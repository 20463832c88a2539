use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use callvault_codec::{parse_envelope, read_wrapped_key_len};
use callvault_secure::{DecryptError, HybridDecryptor, HybridEncryptor, fingerprint_hex};
use zeroize::Zeroizing;

use crate::config::CallvaultConfig;

/// Structural summary of an envelope, produced without any key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeSummary {
    pub total_len: usize,
    pub wrapped_key_len: usize,
    pub nonce: [u8; 12],
    pub ciphertext_len: usize,
}

impl fmt::Display for EnvelopeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "envelope bytes:  {}", self.total_len)?;
        writeln!(f, "wrapped key:     {} bytes", self.wrapped_key_len)?;
        writeln!(f, "nonce:           {}", hex::encode(self.nonce))?;
        write!(f, "ciphertext:      {} bytes (+16 tag)", self.ciphertext_len)
    }
}

/// Load the private key. Any failure here is fatal for the process.
pub fn load_decryptor(config: &CallvaultConfig) -> Result<HybridDecryptor> {
    HybridDecryptor::from_pem_file(&config.keys.private_key_path).with_context(|| {
        format!(
            "loading private key from {}",
            config.keys.private_key_path.display()
        )
    })
}

/// Collapse a decrypt failure to the generic message plus its diagnostic code.
fn public_error(e: &DecryptError) -> anyhow::Error {
    anyhow!("{} ({})", e.public_message(), e.diagnostic_code())
}

/// Decrypt `input` into a file and return the path written.
///
/// Without `output`, the file lands in the configured decrypted directory.
/// With `expected_size`, the envelope is read once and checked against it
/// before any key operation.
pub fn decrypt_to_file(
    config: &CallvaultConfig,
    decryptor: &HybridDecryptor,
    input: &Path,
    output: Option<&Path>,
    expected_size: Option<usize>,
) -> Result<PathBuf> {
    let target = match output {
        Some(p) => p.to_path_buf(),
        None => {
            fs::create_dir_all(&config.storage.decrypted_dir).with_context(|| {
                format!("creating {}", config.storage.decrypted_dir.display())
            })?;
            config.default_output_for(input)
        }
    };
    match expected_size {
        Some(n) => decryptor.decrypt_file_sized(input, Some(target.as_path()), n),
        None => decryptor.decrypt_file(input, Some(target.as_path())),
    }
    .map_err(|e| public_error(&e))
}

/// Decrypt `input` and stream the verified plaintext to `sink`.
pub fn decrypt_to_writer<W: Write + ?Sized>(
    decryptor: &HybridDecryptor,
    input: &Path,
    expected_size: Option<usize>,
    sink: &mut W,
) -> Result<()> {
    let envelope = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let plaintext = Zeroizing::new(
        match expected_size {
            Some(n) => decryptor.decrypt_sized(&envelope, n),
            None => decryptor.decrypt(&envelope),
        }
        .map_err(|e| public_error(&e))?,
    );
    sink.write_all(&plaintext)?;
    sink.flush()?;
    Ok(())
}

/// Parse an envelope's structure without decrypting it.
pub fn inspect(input: &Path) -> Result<EnvelopeSummary> {
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let env = parse_envelope(&data).map_err(|e| {
        let declared = read_wrapped_key_len(&data).map_or_else(|_| "?".into(), |n| n.to_string());
        anyhow!("{e} (declared wrapped key length {declared})")
    })?;
    Ok(EnvelopeSummary {
        total_len: data.len(),
        wrapped_key_len: env.wrapped_key.len(),
        nonce: *env.nonce,
        ciphertext_len: env.ciphertext.len(),
    })
}

/// Encrypt a file the way the recording client does.
pub fn seal(
    config: &CallvaultConfig,
    input: &Path,
    output: &Path,
    public_key: Option<&Path>,
) -> Result<usize> {
    let key_path = public_key.unwrap_or(&config.keys.public_key_path);
    let encryptor = HybridEncryptor::from_public_pem_file(key_path)
        .with_context(|| format!("loading public key from {}", key_path.display()))?;
    encryptor
        .seal_file(input, output)
        .with_context(|| format!("sealing {}", input.display()))
}

/// Fingerprint of the deployed key pair.
pub fn fingerprint(decryptor: &HybridDecryptor) -> String {
    fingerprint_hex(&decryptor.fingerprint())
}
