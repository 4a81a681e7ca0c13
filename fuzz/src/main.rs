#[macro_use]
extern crate afl;

fn main() {
    fuzz!(|data: &[u8]| {
        let _ = relaxson::transform(data);

        for doc in relaxson::transform_documents(data) {
            if doc.is_err() {
                break;
            }
        }
    });
}
