//! Integration tests driving the compiled cfgshift binary

mod helpers;

mod test_apply;
mod test_create;
mod test_doctor;
mod test_init;
mod test_resolve;
mod test_status;
