pub mod local_face_service;
pub mod onnx_face_encoder;
pub mod rustface_detector;
pub mod traits;
