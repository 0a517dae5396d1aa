/*!
 * Monitoring
 * Tracing subscriber setup for the library and the demo binary
 */

mod tracer;

pub use tracer::{init_tracing, span_tick};
