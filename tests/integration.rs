use std::{cell::RefCell, rc::Rc, str::from_utf8};

use bank_ledger::bin_utils::{Service, fixture::Fixture};

const FIXTURE: &str = include_str!("../demos/fixture.toml");
const OPERATIONS: &str = include_str!("../demos/operations.csv");

#[test]
fn replay_operations() {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let mut output = Vec::new();
    let service = Service {
        fixture: Fixture::from_toml_str(FIXTURE).unwrap(),
        input: OPERATIONS.as_bytes(),
        output: &mut output,
        error_printer: Box::new({
            let errors = Rc::clone(&errors);
            move |_line, err| errors.borrow_mut().push(err.to_string())
        }),
    };
    service.run().unwrap();

    let lines: Vec<&str> = from_utf8(&output).unwrap().lines().collect();
    assert_eq!(
        lines,
        [
            "iban,owner,type,balance,active",
            "NL01INHO0000000001,1,CHECKING,0,true",
            "NL10MAZE0000000010,2,CHECKING,500,true",
            "NL11MAZE0000000011,2,SAVINGS,200,true",
            "NL20MAZE0000000020,3,CHECKING,-50,true",
            "NL30MAZE0000000030,4,CHECKING,50,true",
        ]
    );

    assert_eq!(
        *errors.borrow(),
        [
            "Savings accounts can only exchange money with accounts of the same owner",
            "Cannot deposit to or withdraw from savings account NL11MAZE0000000011 at an ATM",
            "Balance of NL10MAZE0000000010 cannot become lower than its absolute limit of 0",
            "User 3 is not authorized to move money from this account",
            "User 4 is blocked",
            "Account NL99MAZE0000000099 not found",
            "Unknown acting user 9",
            "Column `to` is required for Transfer",
        ]
    );
}
