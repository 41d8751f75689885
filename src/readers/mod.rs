mod fixed_width;
pub mod inventory_reader;
pub mod observation_reader;
pub mod series_store;
pub mod station_reader;

pub use inventory_reader::InventoryReader;
pub use observation_reader::ObservationReader;
pub use series_store::SeriesStore;
pub use station_reader::StationReader;
