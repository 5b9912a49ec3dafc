use std::error::Error;

use golden_source::app::run_golden_source;

fn main() -> Result<(), Box<dyn Error>> {
    run_golden_source(std::env::args().skip(1))
}
