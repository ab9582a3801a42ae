pub mod api {
    pub mod models {
        pub mod player;
    }
    pub mod error;
}
pub mod client {
    pub mod client;
}

pub mod logger;
