//! Budget Conversion Example
//!
//! This example demonstrates how to build a command-line tool using
//! olistify for converting vendor budgets to the Olist import format.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use olistify::{
    ConvertError, ConverterBuilder, DateFormat, OutputFormat, ResultWriter, SheetSelector,
};

/// Parsed command-line options
struct Options {
    budget: String,
    catalog: String,
    registry: String,
    customer_id: String,
    template: String,
    output: String,
    sheet_selector: Option<SheetSelector>,
    date_format: Option<DateFormat>,
    output_format: OutputFormat,
    use_stdout: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args);

    match convert_budget(&options) {
        Ok(()) => {
            if !options.use_stdout {
                println!(
                    "Conversion completed: {} -> {}",
                    options.budget, options.output
                );
            }
        }
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> Options {
    if args.len() < 6 {
        eprintln!(
            "Usage: {} <orcamento.xlsx> <mapeamento.xlsx> <clientes.xlsx> <id_cliente> <modelo.xlsx> [saida] [options]",
            args[0]
        );
        eprintln!("\nOptions:");
        eprintln!("  --sheet-name <name>   Budget sheet to read (default: Orçamento, or first)");
        eprintln!("  --date-format <fmt>   Output date format, strftime syntax (default: %Y-%m-%d)");
        eprintln!("  --format <kind>       Output format: xlsx, csv or json (default: xlsx)");
        eprintln!("  --stdout              Write csv/json output to stdout instead of a file");
        eprintln!("\nExamples:");
        eprintln!(
            "  {} orcamento.xlsx mapeamento.xlsx clientes.xlsx 102 modelo.xlsx proposta.xlsx",
            args[0]
        );
        eprintln!(
            "  {} orcamento.xlsx mapeamento.xlsx clientes.xlsx 102 modelo.xlsx --format csv --stdout",
            args[0]
        );
        process::exit(1);
    }

    let mut options = Options {
        budget: args[1].clone(),
        catalog: args[2].clone(),
        registry: args[3].clone(),
        customer_id: args[4].clone(),
        template: args[5].clone(),
        output: "proposta_convertida.xlsx".to_string(),
        sheet_selector: None,
        date_format: None,
        output_format: OutputFormat::Xlsx,
        use_stdout: false,
    };

    // Optional positional output path, then flag options
    let mut i = 6;
    if i < args.len() && !args[i].starts_with("--") {
        options.output = args[i].clone();
        i += 1;
    }

    while i < args.len() {
        match args[i].as_str() {
            "--sheet-name" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --sheet-name requires a value");
                    process::exit(1);
                }
                options.sheet_selector = Some(SheetSelector::Name(args[i + 1].clone()));
                i += 2;
            }
            "--date-format" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --date-format requires a value");
                    process::exit(1);
                }
                options.date_format = Some(DateFormat::Custom(args[i + 1].clone()));
                i += 2;
            }
            "--format" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --format requires a value");
                    process::exit(1);
                }
                options.output_format = match args[i + 1].as_str() {
                    "xlsx" => OutputFormat::Xlsx,
                    "csv" => OutputFormat::Csv,
                    "json" => OutputFormat::Json,
                    other => {
                        eprintln!("Error: Unknown output format: {}", other);
                        process::exit(1);
                    }
                };
                i += 2;
            }
            "--stdout" => {
                options.use_stdout = true;
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
    }

    options
}

fn convert_budget(options: &Options) -> Result<(), ConvertError> {
    let mut builder = ConverterBuilder::new();
    if let Some(ref selector) = options.sheet_selector {
        builder = builder.with_budget_sheet(selector.clone());
    }
    if let Some(ref format) = options.date_format {
        builder = builder.with_date_format(format.clone());
    }
    let converter = builder.build()?;

    let result = converter.convert_path(
        Path::new(&options.budget),
        Path::new(&options.catalog),
        Path::new(&options.registry),
        &options.customer_id,
        Path::new(&options.template),
    )?;

    // Report what the catalog could not resolve before writing anything
    let diagnostics = result.diagnostics();
    for product in &diagnostics.unmapped_products {
        eprintln!("Warning: no catalog match for '{}'", product.original);
    }
    eprintln!(
        "{} rows converted ({} unmapped, {} without product text)",
        result.len(),
        diagnostics.unmapped_products.len(),
        diagnostics.empty_product_rows
    );

    let writer = ResultWriter::from_format(options.output_format);
    if options.use_stdout {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writer.render(&result, &mut handle)?;
        handle.flush()?;
    } else {
        let mut output = File::create(&options.output)?;
        writer.render(&result, &mut output)?;
    }

    Ok(())
}

fn handle_error(error: ConvertError) {
    match error {
        ConvertError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the files exist and you have permission to access them.");
        }
        ConvertError::Spreadsheet(parse_err) => {
            eprintln!("Spreadsheet Error: {}", parse_err);
            eprintln!("The file may not be a valid XLSX workbook or may be corrupted.");
        }
        ConvertError::EmptyWorkbook { file } => {
            eprintln!("Empty Workbook: {}", file);
        }
        ConvertError::MissingSheet { file, sheet } => {
            eprintln!("Missing Sheet: '{}' not found in {}", sheet, file);
            eprintln!("Please check the sheet names in the workbook.");
        }
        ConvertError::MissingColumn { sheet, column } => {
            eprintln!("Missing Column: '{}' not found in sheet '{}'", column, sheet);
            eprintln!("Please check the header row of that sheet.");
        }
        ConvertError::EmptyTemplate { file } => {
            eprintln!("Empty Template: {} has no header row", file);
            eprintln!("The first row of the template defines the output columns.");
        }
        ConvertError::CustomerNotFound { id } => {
            eprintln!("Customer Not Found: '{}'", id);
            eprintln!("Use the list_customers example to see the available IDs.");
        }
        ConvertError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
        }
        ConvertError::InputTooLarge { size, max } => {
            eprintln!("Input Too Large: {} bytes (max: {} bytes)", size, max);
        }
        ConvertError::Workbook(write_err) => {
            eprintln!("Workbook Write Error: {}", write_err);
        }
        ConvertError::Json(json_err) => {
            eprintln!("JSON Error: {}", json_err);
        }
    }
}
