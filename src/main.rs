use clap::{ArgGroup, Parser, Subcommand};
use etcimg::cli::{
    decrypt_image, dump_params, encrypt_image, show_info, DecryptOptions, EncryptOptions,
    OriginalSize, ParamsOptions,
};
use etcimg::grid::Dimensions;
use etcimg::header::{KeySchedule, Mode};
use etcimg::pipeline::Seed;
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("ETCIMG_VERSION");
const BUILD: &str = env!("ETCIMG_BUILD");
const PROFILE: &str = env!("ETCIMG_PROFILE");
const GIT_HASH: &str = env!("ETCIMG_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "etcimg")]
#[command(author, about = "Encryption-then-Compression block scrambling for images", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scramble an image
    #[command(alias = "e")]
    Encrypt {
        /// Input image
        input: PathBuf,

        /// Output image (format from extension)
        output: PathBuf,

        /// Seed; must match at decryption
        #[arg(short, long, default_value = "114514", allow_hyphen_values = true)]
        seed: String,

        /// Key the seed as text even when it is all digits
        #[arg(long)]
        text_seed: bool,

        /// Block size in pixels (multiples of 16 survive JPEG 4:2:0 best)
        #[arg(short, long, default_value_t = 16)]
        block_size: usize,

        /// Key schedule (mt19937 or stdrng)
        #[arg(long, default_value = "mt19937", value_parser = parse_schedule)]
        schedule: KeySchedule,

        /// JPEG quality (1-100)
        #[arg(short, long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        /// Write a sidecar header recording the original size
        #[arg(long)]
        header: Option<PathBuf>,
    },

    /// Restore a scrambled image
    #[command(alias = "d")]
    #[command(group(ArgGroup::new("original").required(true).args(["original_size", "header"])))]
    Decrypt {
        /// Encrypted image
        input: PathBuf,

        /// Output image (format from extension)
        output: PathBuf,

        /// Seed used at encryption
        #[arg(short, long, default_value = "114514", allow_hyphen_values = true)]
        seed: String,

        /// Key the seed as text even when it is all digits
        #[arg(long)]
        text_seed: bool,

        /// Block size used at encryption
        #[arg(short, long, default_value_t = 16)]
        block_size: usize,

        /// Key schedule used at encryption
        #[arg(long, default_value = "mt19937", value_parser = parse_schedule)]
        schedule: KeySchedule,

        /// JPEG quality (1-100)
        #[arg(short, long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: u8,

        /// Size of the image before encryption, e.g. 640x480
        #[arg(long, value_parser = parse_size)]
        original_size: Option<Dimensions>,

        /// Sidecar header written at encryption
        #[arg(long)]
        header: Option<PathBuf>,
    },

    /// Show how an image maps onto the block grid
    #[command(alias = "i")]
    Info {
        /// Image to inspect
        file: PathBuf,

        /// Block size in pixels
        #[arg(short, long, default_value_t = 16)]
        block_size: usize,

        /// Sidecar header to check against the image
        #[arg(long)]
        header: Option<PathBuf>,
    },

    /// Print the per-block parameters derived from a seed as JSON
    #[command(alias = "p")]
    Params {
        /// Number of blocks
        #[arg(short = 'n', long)]
        blocks: usize,

        /// Seed
        #[arg(short, long, default_value = "114514", allow_hyphen_values = true)]
        seed: String,

        /// Key the seed as text even when it is all digits
        #[arg(long)]
        text_seed: bool,

        /// Key schedule
        #[arg(long, default_value = "mt19937", value_parser = parse_schedule)]
        schedule: KeySchedule,
    },
}

fn parse_schedule(s: &str) -> Result<KeySchedule, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_size(s: &str) -> Result<Dimensions, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("etcimg {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Encrypt {
            input,
            output,
            seed,
            text_seed,
            block_size,
            schedule,
            quality,
            header,
        } => {
            let seed = Seed::from_arg(&seed, text_seed);
            println!(
                "[{}] {} -> {} (seed: {})",
                Mode::Encrypt.verb(),
                input.display(),
                output.display(),
                seed
            );
            let options = EncryptOptions {
                seed,
                block_size,
                schedule,
                quality,
                header: header.clone(),
            };

            encrypt_image(&input, &output, &options).map(|report| {
                println!(
                    "Encrypted {} blocks; saved {} image to {}",
                    report.blocks,
                    report.encrypted,
                    output.display()
                );
                println!("Original size: {} (required for decryption)", report.original);
                if let Some(path) = header {
                    println!("Header written to {}", path.display());
                }
            })
        }

        Commands::Decrypt {
            input,
            output,
            seed,
            text_seed,
            block_size,
            schedule,
            quality,
            original_size,
            header,
        } => {
            let seed = Seed::from_arg(&seed, text_seed);
            println!(
                "[{}] {} -> {} (seed: {})",
                Mode::Decrypt.verb(),
                input.display(),
                output.display(),
                seed
            );
            // clap's "original" group guarantees one of the two
            let original = match (original_size, header) {
                (Some(dims), _) => OriginalSize::Exact(dims),
                (None, Some(path)) => OriginalSize::Header(path),
                (None, None) => OriginalSize::Exact(Dimensions::new(0, 0)),
            };
            let options = DecryptOptions {
                seed,
                block_size,
                schedule,
                quality,
                original,
            };

            decrypt_image(&input, &output, &options).map(|dims| {
                println!("Saved {} image to {}", dims, output.display());
            })
        }

        Commands::Info {
            file,
            block_size,
            header,
        } => show_info(&file, block_size, header.as_deref()).map(|info| {
            print!("{}", info);
        }),

        Commands::Params {
            blocks,
            seed,
            text_seed,
            schedule,
        } => {
            let seed = Seed::from_arg(&seed, text_seed);
            let options = ParamsOptions {
                seed,
                schedule,
                blocks,
            };
            dump_params(&options).map(|json| {
                println!("{}", json);
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
