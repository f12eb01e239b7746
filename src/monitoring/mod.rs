/*!
 * Monitoring
 * Structured tracing setup for the emulator
 */

mod tracer;

pub use tracer::init_tracing;
