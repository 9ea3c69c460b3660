pub mod bytes;
pub mod fastq;

pub use self::fastq::FastqParser;
