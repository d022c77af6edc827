pub mod cart_service;
pub mod whatsapp_service;
