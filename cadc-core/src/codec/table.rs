/// Digit-pair substitution table.
///
/// Every two-digit chunk maps to exactly two characters; the only
/// one-character tokens are the punctuation entries, and neither `{` nor `}`
/// appears inside a two-character token. Greedy longest-match decoding can
/// therefore never split or merge tokens. No two tokens differ only in
/// letter case, so archive names stay distinct on case-insensitive
/// filesystems.
pub const TOKENS: [(&str, &str); 102] = [
    ("00", "Aa"),
    ("01", "Bb"),
    ("02", "Cc"),
    ("03", "Dd"),
    ("04", "Ee"),
    ("05", "Ff"),
    ("06", "Gg"),
    ("07", "Hh"),
    ("08", "Ii"),
    ("09", "Jj"),
    ("10", "Kk"),
    ("11", "Ll"),
    ("12", "Mm"),
    ("13", "Nn"),
    ("14", "Oo"),
    ("15", "Pp"),
    ("16", "Qq"),
    ("17", "Rr"),
    ("18", "Ss"),
    ("19", "Tt"),
    ("20", "Uu"),
    ("21", "Vv"),
    ("22", "Ww"),
    ("23", "Xx"),
    ("24", "Yy"),
    ("25", "Zz"),
    ("26", "A0"),
    ("27", "B0"),
    ("28", "C0"),
    ("29", "D0"),
    ("30", "E0"),
    ("31", "F0"),
    ("32", "G0"),
    ("33", "H0"),
    ("34", "I0"),
    ("35", "J0"),
    ("36", "K0"),
    ("37", "L0"),
    ("38", "M0"),
    ("39", "N0"),
    ("40", "O0"),
    ("41", "P0"),
    ("42", "Q0"),
    ("43", "R0"),
    ("44", "S0"),
    ("45", "T0"),
    ("46", "U0"),
    ("47", "V0"),
    ("48", "W0"),
    ("49", "X0"),
    ("50", "Y0"),
    ("51", "Z0"),
    ("52", "ab"),
    ("53", "bc"),
    ("54", "cd"),
    ("55", "de"),
    ("56", "ef"),
    ("57", "fg"),
    ("58", "gh"),
    ("59", "hi"),
    ("60", "ij"),
    ("61", "jk"),
    ("62", "kl"),
    ("63", "lm"),
    ("64", "mn"),
    ("65", "no"),
    ("66", "op"),
    ("67", "pq"),
    ("68", "qr"),
    ("69", "rs"),
    ("70", "st"),
    ("71", "tu"),
    ("72", "uv"),
    ("73", "vw"),
    ("74", "wx"),
    ("75", "xy"),
    ("76", "yz"),
    ("77", "12"),
    ("78", "23"),
    ("79", "34"),
    ("80", "45"),
    ("81", "56"),
    ("82", "67"),
    ("83", "78"),
    ("84", "89"),
    ("85", "90"),
    ("86", "@#"),
    ("87", "#$"),
    ("88", "$%"),
    ("89", "%^"),
    ("90", "^^"),
    ("91", "&&"),
    ("92", "(("),
    ("93", "))"),
    ("94", "++"),
    ("95", "=="),
    ("96", "~~"),
    ("97", "!!"),
    ("98", "@@"),
    ("99", "##"),
    (".", "{"),
    (",", "}"),
];
