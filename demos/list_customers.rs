//! Customer Listing Example
//!
//! This example lists the customers available in a registry workbook,
//! as a plain table or as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example list_customers -- clientes.xlsx
//! cargo run --example list_customers -- clientes.xlsx --json
//! ```

use std::path::Path;
use std::process;

use olistify::CustomerRegistry;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <clientes.xlsx> [--json]", args[0]);
        process::exit(1);
    }

    let registry_path = &args[1];
    let as_json = args.iter().any(|arg| arg == "--json");

    let registry = match CustomerRegistry::load(Path::new(registry_path)) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: Could not load customer registry '{}'", registry_path);
            eprintln!("  {}", e);
            process::exit(1);
        }
    };

    let customers = registry.customers();

    if as_json {
        match serde_json::to_string_pretty(&customers) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: Could not serialize customers: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{:<12} Nome", "ID");
        for customer in &customers {
            println!("{:<12} {}", customer.id, customer.name);
        }
        println!("\n{} customers", customers.len());
    }
}
