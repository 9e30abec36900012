mod file_publisher;

pub use file_publisher::FileContentPublisher;
