use std::io::Write;

use voltaic::{write::text::try_write, DateTime, Decimal, Format, RangeError, ResizableBuffer};
use voltaic_enum::{enum_map, Direction, EnumMapError, Enumerator, MappedEnum};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct Status(u8);

impl MappedEnum for Status {
    type Repr = u8;

    const IS_STRING_ENUM: bool = true;

    fn enumerators() -> Vec<Enumerator<Self>> {
        vec![
            Enumerator::new("Pending", Status(0)).key("pending", Direction::Both),
            Enumerator::new("Shipped", Status(1)).key("shipped", Direction::Both),
            Enumerator::new("Cancelled", Status(2)),
        ]
    }

    fn from_repr(repr: u8) -> Self {
        Status(repr)
    }

    fn to_repr(self) -> u8 {
        self.0
    }
}

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error(transparent)]
    EnumMap(#[from] EnumMapError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Parse(#[from] voltaic::ParseDecimalError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    if let Err(err) = main_err() {
        eprintln!("error: {err}");
    }
}

fn main_err() -> Result<(), Error> {
    let statuses = enum_map::<Status>()?;
    let mut buffer = ResizableBuffer::new();

    let orders = [
        (1001u32, Status(0), "19.99", DateTime::new(2024, 2, 29, 8, 15, 0, 0)?),
        (1002, Status(1), "1234.5", DateTime::new(2024, 3, 1, 17, 45, 30, 2_500_000)?),
        (1003, Status(2), "-5", DateTime::new(2024, 3, 2, 0, 0, 0, 0)?),
    ];

    for (id, status, total, placed) in orders {
        let total: Decimal = total.parse()?;
        assert!(try_write(&mut buffer, id, Format::DEFAULT));
        buffer.write_all(b",");
        buffer.write_all(statuses.to_utf8_key(status).as_bytes());
        buffer.write_all(b",");
        assert!(try_write(&mut buffer, total, Format::from_symbol(b'F')));
        buffer.write_all(b",");
        assert!(try_write(&mut buffer, placed, Format::from_symbol(b'O')));
        buffer.write_all(b"\n");
    }

    // Keys read back from the output bytes, as a decoder would.
    for line in buffer.finalize().split(|&byte| byte == b'\n') {
        if let Some(key) = line.split(|&byte| byte == b',').nth(1) {
            eprintln!("{:?}", statuses.try_from_key(key));
        }
    }

    std::io::stdout().write_all(buffer.finalize())?;
    Ok(())
}
