use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use gazeta_server::error::Error;

fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    gazeta_server::run(true)
}
