pub mod server;

/// Generated protobuf and tonic types
pub mod proto {
    tonic::include_proto!("videocatalog.v1");
}

pub use server::VideoCatalogGrpc;
