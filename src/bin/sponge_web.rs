use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use sponge_web::interceptors::FileInterceptor;
use sponge_web::output::{render_table, write_csv};
use sponge_web::{
    ApiConfig, Comparison, DifferentialExpressionQuery, GseaQuery, MiRnaInteractionQuery, ResultTable,
    SpongeClient, TranscriptExpressionQuery,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "🧬 Query the SPONGE ceRNA web API", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    SPONGE_API_URL            Override the API base URL
    SPONGE_API_TIMEOUT_SECS   Request timeout in seconds
    RUST_LOG                  Log filter (default: warn)

EXAMPLES:
    sponge-web mirna-interactions --disease \"kidney clear cell carcinoma\" \\
        --mimat MIMAT0000076,MIMAT0000261 --limit 15
    sponge-web --format csv diff-expr-gene liver thymoma disease disease --gene-symbol CYP2E1
    sponge-web gsea-plot liver thymoma disease disease \\
        --gene-set GO_Biological_Process_2023 --term GO:0001676 --output plot.png")]
struct Cli {
    /// API base URL [default: SPONGE_API_URL or the public SPONGE API]
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Write every request/response exchange as JSON into this directory
    #[arg(long, global = true)]
    dump_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ComparisonArgs {
    disease_name_1: String,
    disease_name_2: String,
    condition_1: String,
    condition_2: String,
    #[arg(long)]
    disease_subtype_1: Option<String>,
    #[arg(long)]
    disease_subtype_2: Option<String>,
}

impl From<ComparisonArgs> for Comparison {
    fn from(args: ComparisonArgs) -> Self {
        Comparison::new(args.disease_name_1, args.disease_name_2, args.condition_1, args.condition_2)
            .subtypes(args.disease_subtype_1, args.disease_subtype_2)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ceRNA interactions that the given miRNAs contribute to
    MirnaInteractions {
        /// Dataset name (fuzzy matched)
        #[arg(long)]
        disease: Option<String>,
        /// MIMAT number(s), comma separated; combining with --hs is left to the server
        #[arg(long, value_delimiter = ',')]
        mimat: Option<Vec<String>>,
        /// HS number(s), comma separated
        #[arg(long, value_delimiter = ',')]
        hs: Option<Vec<String>>,
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Differential expression of genes
    DiffExprGene {
        #[command(flatten)]
        comparison: ComparisonArgs,
        #[arg(long, value_delimiter = ',', conflicts_with = "gene_symbol")]
        ensg: Option<Vec<String>>,
        #[arg(long, value_delimiter = ',')]
        gene_symbol: Option<Vec<String>>,
    },
    /// Differential expression of transcripts
    DiffExprTranscript {
        #[command(flatten)]
        comparison: ComparisonArgs,
        #[arg(long, value_delimiter = ',')]
        enst: Option<Vec<String>>,
    },
    /// Gene sets with GSEA results for a comparison
    GseaSets {
        #[command(flatten)]
        comparison: ComparisonArgs,
    },
    /// GSEA terms of a gene set
    GseaTerms {
        #[command(flatten)]
        comparison: ComparisonArgs,
        #[arg(long)]
        gene_set: String,
    },
    /// GSEA results, optionally for specific terms
    GseaResults {
        #[command(flatten)]
        comparison: ComparisonArgs,
        #[arg(long)]
        gene_set: String,
        #[arg(long, value_delimiter = ',')]
        term: Option<Vec<String>>,
    },
    /// GSEA enrichment plot for one term, saved as PNG
    GseaPlot {
        #[command(flatten)]
        comparison: ComparisonArgs,
        #[arg(long)]
        gene_set: String,
        #[arg(long)]
        term: String,
        #[arg(short, long, default_value = "gsea_plot.png")]
        output: PathBuf,
    },
}

fn build_client(cli: &Cli) -> Result<SpongeClient> {
    let mut config = ApiConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let mut client = SpongeClient::new(config)?;
    if let Some(dir) = &cli.dump_dir {
        client = client.with_interceptor(Arc::new(FileInterceptor::new(dir.clone())));
    }
    Ok(client)
}

fn print_table(table: &ResultTable, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if table.is_empty() {
                println!("{}", "No results found.".yellow());
                return Ok(());
            }
            println!("{}", render_table(table));
            println!("\n{}", format!("{} rows returned", table.len()).green());
        }
        OutputFormat::Csv => write_csv(table, io::stdout().lock()).context("failed to write CSV")?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table.to_json())?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let client = build_client(&cli)?;

    let table = match cli.command {
        Command::MirnaInteractions { disease, mimat, hs, limit, offset } => {
            let query = MiRnaInteractionQuery {
                disease_name: disease,
                mimat_numbers: mimat,
                hs_numbers: hs,
                limit,
                offset,
            };
            client.find_specific_mirna_interactions(&query).await?
        }
        Command::DiffExprGene { comparison, ensg, gene_symbol } => {
            let query = DifferentialExpressionQuery {
                comparison: comparison.into(),
                ensg_numbers: ensg,
                gene_symbols: gene_symbol,
            };
            client.differential_expression_gene(&query).await?
        }
        Command::DiffExprTranscript { comparison, enst } => {
            let query = TranscriptExpressionQuery { comparison: comparison.into(), enst_numbers: enst };
            client.differential_expression_transcript(&query).await?
        }
        Command::GseaSets { comparison } => client.gsea_sets(&GseaQuery::new(comparison.into())).await?,
        Command::GseaTerms { comparison, gene_set } => {
            client.gsea_terms(&GseaQuery::new(comparison.into()).gene_set(gene_set)).await?
        }
        Command::GseaResults { comparison, gene_set, term } => {
            let query = GseaQuery { comparison: comparison.into(), gene_set: Some(gene_set), terms: term };
            client.gsea_results(&query).await?
        }
        Command::GseaPlot { comparison, gene_set, term, output } => {
            let query = GseaQuery::new(comparison.into()).gene_set(gene_set).terms([term]);
            let plot = client.gsea_plot(&query).await?;
            plot.write_to(&output)
                .await
                .with_context(|| format!("failed to write plot to {}", output.display()))?;
            println!("{}", format!("Plot saved to {}", output.display()).green());
            return Ok(());
        }
    };

    print_table(&table, &cli.format)
}
