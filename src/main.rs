//! CLI for emitting circuit input documents.
//!
//! Usage examples:
//!   cargo run --release -- h256 --token "$JWT" --secret secret_key
//!   cargo run --release -- rs256 --token "$JWT" --pubkey keys/public.pem --bits 2048
//!   cargo run --release -- pubkey --pubkey keys/public.pem -o inputs/pub_key.json
//!   cargo run --release -- inspect --input inputs/rs256.json --layout rs256
//!
//! Documents are written as JSON to stdout unless `--output` is given. Set
//! RUST_LOG=debug to see what was encoded.

use jwt_circuit_inputs::{
    CircuitInputs, EncoderConfig, H256Inputs, Jwt, JwtAlgorithm, JwtStringInputs, KeyBits,
    Rs256Inputs, RsaPubKey,
};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    env::args,
    error::Error,
    fs,
    io::Write,
    path::{Path, PathBuf},
    process,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    H256,
    Rs256,
    JwtString,
    PubKey,
    Inspect,
}

#[derive(Debug, Default, Clone)]
struct CommandOptions {
    token: Option<String>,
    secret: Option<String>,
    pubkey: Option<PathBuf>,
    bits: Option<KeyBits>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    input: Option<PathBuf>,
    layout: Option<String>,
}

#[derive(Debug, Clone)]
struct ParsedCommand {
    command: Command,
    options: CommandOptions,
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = args().collect();
    let command_args: &[String] = if args.len() > 1 { &args[1..] } else { &[] };

    let parsed = match parse_command(command_args) {
        Ok(cmd) => cmd,
        Err(err) => {
            eprintln!("Error: {}", err);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(err) = execute(parsed) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn execute(parsed: ParsedCommand) -> Result<(), Box<dyn Error>> {
    let ParsedCommand { command, options } = parsed;

    let config = match &options.config {
        Some(path) => EncoderConfig::from_json_file(path)?,
        None => EncoderConfig::default(),
    };

    let document = match command {
        Command::H256 => {
            let jwt = Jwt::parse(required(&options.token, "--token")?, JwtAlgorithm::H256)?;
            let secret = required(&options.secret, "--secret")?;
            H256Inputs::new(
                &jwt,
                &config.capacities,
                secret.as_bytes(),
                config.secret_key_capacity,
            )?
            .to_json()?
        }
        Command::Rs256 => {
            let pub_key = load_pub_key(required(&options.pubkey, "--pubkey")?)?;
            let bits = resolve_bits(options.bits, &pub_key);
            let jwt = Jwt::parse(
                required(&options.token, "--token")?,
                JwtAlgorithm::Rs256 { bits },
            )?;
            Rs256Inputs::new(&jwt, &pub_key, &config.capacities, &config.limbs)?.to_json()?
        }
        Command::JwtString => {
            let jwt = Jwt::parse(required(&options.token, "--token")?, JwtAlgorithm::H256)?;
            let secret = required(&options.secret, "--secret")?;
            JwtStringInputs::new(
                &jwt,
                config.jwt_string_capacity,
                secret.as_bytes(),
                config.secret_key_capacity,
            )?
            .to_json()?
        }
        Command::PubKey => {
            let pub_key = load_pub_key(required(&options.pubkey, "--pubkey")?)?;
            let bits = resolve_bits(options.bits, &pub_key);
            pub_key.to_circuit_inputs(bits, &config.limbs)?
        }
        Command::Inspect => {
            let input = required(&options.input, "--input")?;
            let json: Value = serde_json::from_str(&fs::read_to_string(input)?)?;
            let layout = required(&options.layout, "--layout")?;
            let fields = match layout.as_str() {
                l if l == H256Inputs::LAYOUT => H256Inputs::parse_document(&json)?,
                l if l == Rs256Inputs::LAYOUT => Rs256Inputs::parse_document(&json)?,
                l if l == JwtStringInputs::LAYOUT => JwtStringInputs::parse_document(&json)?,
                other => return Err(format!("Unknown layout '{other}'").into()),
            };
            info!(layout = %layout, fields = fields.len(), "input document is well formed");

            let rendered: BTreeMap<String, Vec<String>> = fields
                .into_iter()
                .map(|(name, values)| {
                    let values: Vec<String> =
                        values.iter().map(|v| config.limbs.format.render(v)).collect();
                    (name, values)
                })
                .collect();
            serde_json::to_value(rendered)?
        }
    };

    write_output(&document, options.output.as_ref())
}

fn required<'a, T>(value: &'a Option<T>, flag: &str) -> Result<&'a T, String> {
    value
        .as_ref()
        .ok_or_else(|| format!("Missing required option {flag}"))
}

/// Explicit `--bits` wins; otherwise the key's own size, falling back to 2048.
fn resolve_bits(explicit: Option<KeyBits>, pub_key: &RsaPubKey) -> KeyBits {
    explicit.or_else(|| pub_key.key_bits()).unwrap_or_else(|| {
        warn!(
            modulus_bits = pub_key.modulus().bits(),
            "modulus is neither 1024 nor 2048 bits, encoding as 2048"
        );
        KeyBits::default()
    })
}

/// PEM if the file looks like PEM, DER otherwise.
fn load_pub_key(path: &Path) -> Result<RsaPubKey, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let key = match std::str::from_utf8(&bytes) {
        Ok(text) if text.trim_start().starts_with("-----BEGIN") => RsaPubKey::from_pem(text)?,
        _ => RsaPubKey::from_asn1(&bytes)?,
    };
    info!(path = %path.display(), modulus_bits = key.modulus().bits(), "loaded public key");
    Ok(key)
}

fn write_output(document: &Value, output: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    let text = serde_json::to_string_pretty(document)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
            info!(path = %path.display(), "wrote circuit inputs");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}")?;
        }
    }
    Ok(())
}

fn parse_command(args: &[String]) -> Result<ParsedCommand, String> {
    if args.is_empty() {
        return Err("No command provided".into());
    }

    let command = match args[0].as_str() {
        "-h" | "--help" => {
            print_usage();
            process::exit(0);
        }
        "h256" => Command::H256,
        "rs256" => Command::Rs256,
        "jwt-string" | "jwt_string" => Command::JwtString,
        "pubkey" | "pub_key" => Command::PubKey,
        "inspect" => Command::Inspect,
        other => return Err(format!("Unknown command '{other}'")),
    };

    let options = parse_options(&args[1..])?;
    Ok(ParsedCommand { command, options })
}

fn parse_options(args: &[String]) -> Result<CommandOptions, String> {
    let mut options = CommandOptions::default();
    let mut index = 0;

    while index < args.len() {
        let arg = &args[index];
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg.as_str(), None),
        };

        if flag == "--help" || flag == "-h" {
            print_usage();
            process::exit(0);
        }

        let value = match inline {
            Some(value) => value,
            None => {
                index += 1;
                args.get(index)
                    .cloned()
                    .ok_or_else(|| format!("Missing value for {flag}"))?
            }
        };
        if value.is_empty() {
            return Err(format!("Missing value for {flag}"));
        }

        match flag {
            "--token" | "-t" => options.token = Some(value),
            "--secret" | "-s" => options.secret = Some(value),
            "--pubkey" | "-k" => options.pubkey = Some(PathBuf::from(value)),
            "--bits" | "-b" => options.bits = Some(value.parse()?),
            "--config" | "-c" => options.config = Some(PathBuf::from(value)),
            "--output" | "-o" => options.output = Some(PathBuf::from(value)),
            "--input" | "-i" => options.input = Some(PathBuf::from(value)),
            "--layout" | "-l" => options.layout = Some(value),
            _ => return Err(format!("Unknown option '{arg}'")),
        }
        index += 1;
    }

    Ok(options)
}

fn print_usage() {
    eprintln!(
        "Usage:
  jwt-circuit-inputs <h256|rs256|jwt-string|pubkey|inspect> [options]

Commands:
  h256                 HMAC-SHA256 token inputs (header, payload, signature, secret_key)
  rs256                RSA-SHA256 token inputs (header, payload, signature limbs, pub_key)
  jwt-string           Whole-token inputs with segment lengths and secret_key
  pubkey               RSA public key limbs only ({{ pub_key: {{ modulus, redc }} }})
  inspect              Read an emitted document back and print its fields

Options:
  --token, -t <jwt>        Compact JWT (h256, rs256, jwt-string)
  --secret, -s <text>      HMAC secret (h256, jwt-string)
  --pubkey, -k <path>      RSA public key, PEM or DER (rs256, pubkey)
  --bits, -b <1024|2048>   Declared modulus size (defaults to the key's own size)
  --config, -c <path>      Encoder config JSON (limb width/order/format, capacities)
  --output, -o <path>      Write the document here instead of stdout
  --input, -i <path>       Document to read (inspect)
  --layout, -l <name>      h256 | rs256 | jwt-string (inspect)

Examples:
  cargo run --release -- h256 --token \"$JWT\" --secret secret_key
  cargo run --release -- rs256 --token \"$JWT\" --pubkey keys/public.pem
  cargo run --release -- inspect --input inputs/h256.json --layout h256"
    );
}
