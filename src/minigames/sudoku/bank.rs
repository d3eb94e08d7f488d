//! Static puzzle bank. Each string is 81 cells row by row; `0` is blank.

pub struct Puzzle {
    pub givens: &'static str,
    pub solution: &'static str,
}

pub static BANK: [Puzzle; 4] = [
    Puzzle {
        givens: "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
        solution: "534678912672195348198342567859761423426853791713924856961537284287419635345286179",
    },
    Puzzle {
        givens: "540263000701000400002000000090020060310408092050070010000000800004000203000794051",
        solution: "549263187731589426682147935497321568316458792258976314175632849964815273823794651",
    },
    Puzzle {
        givens: "700050002600702003900010005420090000500384000087000050050000170000638004000070098",
        solution: "748953612615742983932816745426597831591384267387261459853429176179638524264175398",
    },
    Puzzle {
        givens: "056784000930000060800000000001008004079260801005003009000000020600000780000631905",
        solution: "156784392937152468842396517361978254479265831285413679593847126614529783728631945",
    },
];
