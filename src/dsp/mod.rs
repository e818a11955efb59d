pub mod fft;
pub mod mixer;
pub mod peaks;
pub mod processor;
pub mod window;
