mod app;
mod catalog;
mod config;
mod error;
mod format;
mod mpris;
mod runtime;
mod search;
mod session;
mod transport;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
