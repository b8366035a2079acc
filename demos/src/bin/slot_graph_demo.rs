use clap::Parser;

use redlilium_serial_demos::{DemoArgs, run};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = DemoArgs::parse();
    log::info!("Starting RedLilium slot graph demo");
    log::info!("Demos version: {}", redlilium_serial_demos::VERSION);

    match run(&args) {
        Ok(report) => {
            if args.print_text {
                println!("{}", report.text);
            }
            for variable in &report.variables {
                println!("{variable}");
            }
            log::info!(
                "Reloaded {} slots as {}; value sum = ({}, {})",
                report.variables.len(),
                report.format,
                report.value_sum.x,
                report.value_sum.y
            );
        }
        Err(err) => {
            log::error!("Demo failed: {err}");
            std::process::exit(1);
        }
    }
}
