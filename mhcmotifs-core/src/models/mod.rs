pub mod grade;
pub mod record;

// re-export for cleaner imports
pub use self::grade::Grade;
pub use self::record::RawRecord;
