fn main() {
    use dialplan::{parser, country, metadata::DATABASE};
    let n = parser::parse_and_keep_raw_input(Some(country::GB), "+442087654321").unwrap();
    println!("{:?}", n.country_code_source());
    println!("{}", n.format_in_original_format(&DATABASE, country::GB));

    let n2 = parser::parse_and_keep_raw_input(Some(country::GB), "02087654321").unwrap();
    println!("{:?}", n2.country_code_source());
    println!("{}", n2.format_in_original_format(&DATABASE, country::GB));
}
