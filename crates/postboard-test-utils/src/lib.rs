pub mod assertions;
pub mod fakes;
pub mod multipart;
pub mod server;
pub mod stores;

pub use assertions::{assert_envelope_error, assert_envelope_ok, assert_violations};
pub use fakes::{MemoryBlobStore, MemoryPostStore};
pub use multipart::{MultipartBody, fake_image};
pub use server::{
    TEST_PUBLIC_URL, create_test_app_state, create_test_config, create_test_router,
    create_test_router_and_stores, send_multipart, send_raw, send_request,
};
pub use stores::{TestStores, create_test_stores};
