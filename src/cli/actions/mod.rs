pub mod check;

#[derive(Debug)]
pub enum Action {
    Check,
}
