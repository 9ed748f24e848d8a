// =============================================================================
// Market data acquisition
// =============================================================================
//
// Everything here ends in a validated `Series`; the engine never sees raw
// provider data.

pub mod file;
pub mod yahoo;

pub use file::load_bars_json;
pub use yahoo::YahooClient;
