pub mod address;
pub mod postal_code;
pub mod temperature;
pub mod weather;

pub use address::AddressRecord;
pub use postal_code::PostalCode;
pub use temperature::TemperatureSummary;
pub use weather::WeatherSnapshot;
