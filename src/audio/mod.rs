pub mod analyser;
pub mod capture;
pub mod decode;
pub mod frame;
pub mod tone;
