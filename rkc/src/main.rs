use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rankcode::{Codec, RankcodeConfig, SizeReport, SkipPolicy, SourceText};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing::*;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    globals: Globals,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Globals {
    /// Read settings from a JSON config file
    ///
    /// Options given on the command line take precedence over the file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,
}

/// Options that control how the rank table is built.
#[derive(Args, Clone, Debug, Default)]
struct TableArgs {
    /// Corpus frequency list, a `word,count` CSV file with a header row, most frequent word first
    #[arg(long, value_name = "FILE")]
    corpus: Option<PathBuf>,

    /// Word to rank ahead of everything in the corpus.  May be repeated; seeds are ranked in the
    /// order given.
    #[arg(long = "seed", value_name = "WORD")]
    seeds: Vec<String>,

    /// How short, very frequent words are kept from taking the lowest ranks
    #[arg(long, value_name = "POLICY")]
    skip_policy: Option<SkipPolicy>,
}

impl TableArgs {
    /// Layer these options over the config loaded from file (or the defaults).
    fn apply(&self, mut config: RankcodeConfig) -> RankcodeConfig {
        if let Some(corpus) = &self.corpus {
            config.corpus = corpus.clone();
        }
        if !self.seeds.is_empty() {
            config.seed_words = self.seeds.clone();
        }
        if let Some(skip_policy) = self.skip_policy {
            config.skip_policy = skip_policy;
        }

        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replace words with their rank codes
    Encode {
        #[command(flatten)]
        table: TableArgs,

        /// Number of words in the rank table
        #[arg(short, long)]
        size: Option<usize>,

        /// Text to encode.  If not specified, the text is read from stdin.
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Where to write the coded text.  If not specified, it's written to stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Restore rank coded text
    ///
    /// The table options and size must match the ones the text was encoded with.
    Decode {
        #[command(flatten)]
        table: TableArgs,

        /// Number of words in the rank table
        #[arg(short, long)]
        size: Option<usize>,

        /// Coded text to decode.  If not specified, it is read from stdin.
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Where to write the decoded text.  If not specified, it's written to stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Encode each text with tables of several sizes and report how much smaller it gets
    Report {
        #[command(flatten)]
        table: TableArgs,

        /// Comma separated list of text files
        files: String,

        /// Treat each file as tab separated, and use the last field of every row as the text
        #[arg(long)]
        tsv: bool,

        /// Comma separated table sizes to try, instead of the sizes in the config
        #[arg(long, value_delimiter = ',')]
        sizes: Vec<usize>,
    },

    /// Print the rank table as `rank,word` lines
    Table {
        #[command(flatten)]
        table: TableArgs,

        /// Number of words in the rank table
        #[arg(short, long)]
        size: Option<usize>,
    },
}

impl Commands {
    fn execute(self, globals: &Globals) -> anyhow::Result<()> {
        let config = match globals.config.as_deref() {
            Some(path) => RankcodeConfig::load(path)?,
            None => RankcodeConfig::default(),
        };

        use Commands::*;
        match self {
            Encode {
                table,
                size,
                input,
                output,
            } => {
                let codec = build_codec(table.apply(config), size)?;
                let text = read_input(input.as_deref())?;

                let encoded = codec.encode(&text);
                info!(
                    words_replaced = encoded.stats.words_replaced,
                    total_words = encoded.stats.total_words,
                    original_bytes = text.len(),
                    coded_bytes = encoded.coded.len(),
                    "Encoded text"
                );

                write_output(output.as_deref(), &encoded.coded)?;
            }
            Decode {
                table,
                size,
                input,
                output,
            } => {
                let codec = build_codec(table.apply(config), size)?;
                let coded = read_input(input.as_deref())?;

                write_output(output.as_deref(), &codec.decode(&coded))?;
            }
            Report {
                table,
                files,
                tsv,
                sizes,
            } => {
                let config = table.apply(config);
                let sizes = if sizes.is_empty() {
                    config.table_sizes.clone()
                } else {
                    sizes
                };
                let texts = if tsv {
                    files
                        .split(',')
                        .map(str::trim)
                        .filter(|path| !path.is_empty())
                        .map(|path| -> anyhow::Result<SourceText> {
                            let path = PathBuf::from(path);
                            let text = rankcode::load_tsv_column(&path)?;
                            Ok(SourceText { path, text })
                        })
                        .collect::<anyhow::Result<Vec<_>>>()?
                } else {
                    rankcode::load_texts(&files)?
                };

                report(&config, &texts, &sizes)?;
            }
            Table { table, size } => {
                let config = table.apply(config);
                let table = config.build_table(size.unwrap_or(config.table_size))?;

                let stdout = std::io::stdout();
                let mut stdout = stdout.lock();
                for (rank, word) in table.ranked_words() {
                    writeln!(stdout, "{rank},{word}")?;
                }
                stdout.flush()?;
            }
        }

        Ok(())
    }
}

fn build_codec(mut config: RankcodeConfig, size: Option<usize>) -> anyhow::Result<Codec> {
    if let Some(size) = size {
        config.table_size = size;
    }
    debug!(?config, "Building codec");

    Ok(config.build_codec()?)
}

/// Encode every text with a table of every size, printing one report per combination.
///
/// The corpus is read once and reused for all of the tables.
fn report(config: &RankcodeConfig, texts: &[SourceText], sizes: &[usize]) -> anyhow::Result<()> {
    config.codec.validate()?;
    let corpus = rankcode::read_corpus(&config.corpus)?;
    let builder = config.table_builder();

    for &size in sizes {
        let table = builder.build(corpus.iter().cloned(), size)?;
        let codec = Codec::new(table, config.codec.clone())?;

        for source in texts {
            let encoded = codec.encode(&source.text);
            let decoded = codec.decode(&encoded.coded);
            let report = SizeReport::new(&source.text, &encoded, &decoded);
            if !report.round_trip {
                warn!(path = %source.path.display(), size,
                    "Decoded text does not match the original");
            }

            println!("{} with a {} word table:", source.path.display(), size);
            println!("{report}");
            println!();
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => Ok(rankcode::load_text(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Error reading text from stdin")?;
            Ok(text)
        }
    }
}

fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Error writing output file {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let default_log_directive = match cli.globals.debug {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Logs go to stderr so they never mix with coded text on stdout
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_log_directive.into())
                .from_env_lossy(),
        )
        .json()
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    if let Some(config_path) = cli.globals.config.as_deref() {
        debug!("Value for config: {}", config_path.display());
    }

    if let Err(e) = cli.command.execute(&cli.globals) {
        error!("{:#}", e);
        exit(1);
    } else {
        debug!("command executed successfully");
    }
}
