pub mod wordcab;
