use std::io::Write;

use roster_core::image::decode_file;
use roster_core::validation::IMAGE_TOO_LARGE;
use roster_core::{
    Country, FormController, FormError, Gender, Hobby, RecordStore, Route, Router,
};
use tempfile::NamedTempFile;

fn image_file(suffix: &str, size: usize) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(&vec![0u8; size]).unwrap();
    file
}

async fn attach(form: &mut FormController, file: &NamedTempFile) {
    let ticket = form.begin_image("upload").unwrap();
    let result = decode_file(file.path()).await;
    assert!(form.complete_image(ticket, result));
}

#[tokio::test]
async fn create_list_edit_round_trip() {
    let mut store = RecordStore::new();
    let mut router = Router::default();
    let picture = image_file(".png", 100 * 1024);

    router.navigate(Route::parse("/addform"));
    assert_eq!(router.current(), &Route::Create);

    let mut form = FormController::create();
    form.set_username("John_Doe").unwrap();
    form.set_email("john@example.com").unwrap();
    form.set_gender(Some(Gender::Male)).unwrap();
    form.toggle_hobby(Hobby::Cricket).unwrap();
    form.toggle_hobby(Hobby::Dance).unwrap();
    form.set_country(Some(Country::Nepal)).unwrap();
    form.set_message("Hi there").unwrap();
    attach(&mut form, &picture).await;

    let commit = form.submit(&mut store).unwrap();
    assert_eq!(router.apply(commit.navigation), &Route::List);

    let listed = store.list();
    assert_eq!(listed.len(), 1);
    let record = &listed[0];
    assert_eq!(record.id, commit.id);
    assert_eq!(record.username, "John_Doe");
    assert_eq!(record.email, "john@example.com");
    assert_eq!(record.gender, Some(Gender::Male));
    assert_eq!(record.hobbies_label(), "Cricket Dance");
    assert_eq!(record.country, Some(Country::Nepal));
    assert_eq!(record.message, "Hi there");
    assert_eq!(record.image.mime_type, "image/png");
    assert_eq!(record.image.size_bytes, 100 * 1024);

    let id = record.id;
    router.navigate(Route::Edit(id));
    let mut edit = FormController::edit(&store, id).unwrap();
    edit.set_country(Some(Country::Usa)).unwrap();
    let commit = edit.submit(&mut store).unwrap();
    assert_eq!(commit.id, id);
    assert_eq!(router.apply(commit.navigation), &Route::List);

    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].id, id);
    assert_eq!(store.list()[0].country, Some(Country::Usa));
}

#[tokio::test]
async fn oversized_and_wrong_type_images_are_refused() {
    let mut store = RecordStore::new();

    for (suffix, size, expected) in [
        (".png", 300 * 1024, IMAGE_TOO_LARGE),
        (".pdf", 1024, "invalid Image"),
    ] {
        let file = image_file(suffix, size);
        let mut form = FormController::create();
        form.set_username("Jane_Doe").unwrap();
        form.set_email("jane@example.com").unwrap();
        form.toggle_hobby(Hobby::Football).unwrap();
        attach(&mut form, &file).await;

        let Err(FormError::Invalid(errors)) = form.submit(&mut store) else {
            panic!("{} upload should be refused", suffix);
        };
        assert_eq!(errors.image.as_deref(), Some(expected));
        assert_eq!(errors.count(), 1);
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn deleted_record_leaves_list_and_edit_route_resolves_to_not_found() {
    let mut store = RecordStore::new();
    let picture = image_file(".jpg", 2048);

    let mut form = FormController::create();
    form.set_username("Temp_User").unwrap();
    form.set_email("temp@example.com").unwrap();
    form.toggle_hobby(Hobby::Coding).unwrap();
    attach(&mut form, &picture).await;
    let commit = form.submit(&mut store).unwrap();

    store.remove(commit.id).unwrap();
    assert!(store.list().iter().all(|r| r.id != commit.id));
    assert!(matches!(
        FormController::edit(&store, commit.id),
        Err(FormError::RecordNotFound(_))
    ));
}
