pub use routes::ReceivedUpdate;
pub use test_server::{
    TEST_ACCESS_TOKEN, TestsContext, generate_service_account, start_test_parameter_server,
};

mod routes;
mod test_server;
