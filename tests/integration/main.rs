mod e2e_test;
mod history_test;
