pub mod ofx;
