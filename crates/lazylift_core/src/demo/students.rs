use super::{open_demo_db, DemoOptions, DemoResult};
use crate::db::Schema;
use crate::model::student::NewAddress;
use crate::repo::student_repo::{
    SqliteLinkedStudentRepository, SqliteStudentRepository, StudentRepository,
};
use crate::service::student_service::StudentService;
use std::io::Write;

/// Address row owns the foreign key.
pub fn one_to_one(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let conn = open_demo_db(Schema::OneToOne, options)?;
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn)?);
    enroll_and_clear(&service, out)
}

/// Both rows own a foreign key to each other.
pub fn one_to_one_linked(options: DemoOptions, out: &mut dyn Write) -> DemoResult<()> {
    let conn = open_demo_db(Schema::OneToOneLinked, options)?;
    let service = StudentService::new(SqliteLinkedStudentRepository::try_new(&conn)?);
    enroll_and_clear(&service, out)
}

fn enroll_and_clear<R: StudentRepository>(
    service: &StudentService<R>,
    out: &mut dyn Write,
) -> DemoResult<()> {
    let address = NewAddress::new("12 Curzon St", "London", "W1J 5HN");
    let student = service.enroll("Ada", "Lovelace", &address)?;
    writeln!(out, "{student}")?;
    if let Some(address) = &student.address {
        writeln!(out, "{address}")?;
    }

    if let Some(city) = service.city_of("Lovelace")? {
        writeln!(out, "{city}")?;
    }

    service.clear_address("Lovelace")?;
    writeln!(
        out,
        "address cleared; address rows left: {}",
        service.address_count()?
    )?;
    Ok(())
}
