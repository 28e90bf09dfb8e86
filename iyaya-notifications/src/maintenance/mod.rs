pub mod verify_emails;
