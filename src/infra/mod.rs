pub mod s3_client;
