pub mod console_sink;
pub mod counter;
pub mod fizz;
pub mod manual_source;

pub use console_sink::ConsoleSink;
pub use counter::CounterOperator;
pub use fizz::FizzOperator;
pub use manual_source::ManualSource;
