// cmdwire entry point

use cmdwire_cli::router::Cli;

fn main() {
    match Cli::route() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
