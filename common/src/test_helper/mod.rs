pub mod test_clock;
