//! Generated Protocol Buffers code.

tonic::include_proto!("notra.v1");

/// Serialized file descriptor set for gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("notra_descriptor");
