pub mod raw_data_io;
