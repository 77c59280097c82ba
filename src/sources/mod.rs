pub mod mangapark;
